use std::collections::{BTreeMap, BTreeSet};

use crate::pipeline::dataset::{SalesDataset, SalesRecord, FILTER_DIMENSIONS};
use crate::pipeline::AnalyticsError;

/// An immutable set of per-dimension value filters.
///
/// Each populated dimension keeps the rows whose value is a member of
/// its allowed set; dimensions that are absent impose no constraint.
/// A populated dimension with an empty set keeps nothing, which is what
/// a dashboard user gets after deselecting every value of a multiselect.
///
/// Backed by ordered collections so equal selections hash equally and
/// can serve as cache keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    dimensions: BTreeMap<String, BTreeSet<String>>,
}

impl Selection {
    /// A selection with no constraints; every row passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The original dashboards default every multiselect to the full
    /// set of observed values. Filtering with this selection keeps
    /// every row but pins each dimension's domain.
    pub fn full_domain(dataset: &SalesDataset) -> Result<Self, AnalyticsError> {
        let mut selection = Self::new();
        for dimension in FILTER_DIMENSIONS {
            selection
                .dimensions
                .insert(dimension.to_string(), dataset.distinct_values(dimension)?);
        }
        Ok(selection)
    }

    /// Replaces the allowed values of one dimension.
    pub fn allow<I, S>(mut self, dimension: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions.insert(
            dimension.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Drops a dimension's constraint entirely.
    pub fn unconstrain(mut self, dimension: &str) -> Self {
        self.dimensions.remove(dimension);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn allowed(&self, dimension: &str) -> Option<&BTreeSet<String>> {
        self.dimensions.get(dimension)
    }

    pub fn dimensions(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.dimensions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Applies every dimension filter conjunctively and returns the
    /// matching rows in dataset order.
    pub fn apply(&self, dataset: &SalesDataset) -> Result<FilteredView, AnalyticsError> {
        let mut rows: Option<Vec<usize>> = None;

        for (dimension, allowed) in &self.dimensions {
            if allowed.is_empty() {
                // Deselecting every value of one dimension empties the view
                return Ok(FilteredView { rows: Vec::new() });
            }

            let matching = dataset.filter_in_set(dimension, allowed)?;
            rows = Some(match rows {
                None => matching,
                Some(existing) => intersect_sorted(existing, matching),
            });
        }

        Ok(FilteredView {
            rows: rows.unwrap_or_else(|| (0..dataset.row_count()).collect()),
        })
    }
}

/// The rows passing a [`Selection`], in dataset order. A pure derivation
/// with no identity of its own; recomputed on every selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView {
    rows: Vec<usize>,
}

impl FilteredView {
    /// A view over the whole dataset.
    pub fn all(dataset: &SalesDataset) -> Self {
        FilteredView {
            rows: (0..dataset.row_count()).collect(),
        }
    }

    pub(crate) fn from_rows(rows: Vec<usize>) -> Self {
        FilteredView { rows }
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Materializes the view as owned records, the record-sequence form
    /// handed to the rendering side.
    pub fn records(&self, dataset: &SalesDataset) -> Result<Vec<SalesRecord>, AnalyticsError> {
        self.rows.iter().map(|&idx| dataset.record(idx)).collect()
    }
}

/// Intersects two row-index lists. Both come out of in-order scans, so
/// they are already ascending.
fn intersect_sorted(a: Vec<usize>, b: Vec<usize>) -> Vec<usize> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::dataset::col;
    use crate::pipeline::testutil::sample_dataset;

    #[test]
    fn absent_dimension_passes_everything() {
        let dataset = sample_dataset();
        let view = Selection::new().apply(&dataset).unwrap();
        assert_eq!(view.len(), dataset.row_count());
    }

    #[test]
    fn single_dimension_keeps_members_in_order() {
        let dataset = sample_dataset();
        let view = Selection::new()
            .allow(col::REGION, ["West"])
            .apply(&dataset)
            .unwrap();
        assert_eq!(view.rows(), &[0, 2]);
    }

    #[test]
    fn dimensions_combine_conjunctively() {
        let dataset = sample_dataset();
        let view = Selection::new()
            .allow(col::REGION, ["West", "East"])
            .allow(col::CATEGORY, ["Furniture"])
            .apply(&dataset)
            .unwrap();
        assert_eq!(view.rows(), &[1]);
    }

    #[test]
    fn empty_value_set_empties_the_view() {
        let dataset = sample_dataset();
        let view = Selection::new()
            .allow(col::REGION, Vec::<String>::new())
            .apply(&dataset)
            .unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn full_domain_matches_every_row() {
        let dataset = sample_dataset();
        let selection = Selection::full_domain(&dataset).unwrap();
        assert!(!selection.is_unconstrained());
        let view = selection.apply(&dataset).unwrap();
        assert_eq!(view.len(), dataset.row_count());
    }

    #[test]
    fn narrowing_a_selection_never_grows_the_view() {
        let dataset = sample_dataset();
        let wide = Selection::new()
            .allow(col::REGION, ["West", "East", "South"])
            .apply(&dataset)
            .unwrap();
        let narrow = Selection::new()
            .allow(col::REGION, ["West"])
            .apply(&dataset)
            .unwrap();
        assert!(narrow.len() <= wide.len());
        assert!(narrow.rows().iter().all(|r| wide.rows().contains(r)));
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let dataset = sample_dataset();
        let selection = Selection::new().allow(col::REGION, ["West"]);
        let once = selection.apply(&dataset).unwrap();
        let twice = selection.apply(&dataset).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_dimension_is_a_schema_error() {
        let dataset = sample_dataset();
        let err = Selection::new()
            .allow("Warehouse", ["A"])
            .apply(&dataset)
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingColumn(_)));
    }

    #[test]
    fn records_materialize_in_view_order() {
        let dataset = sample_dataset();
        let view = Selection::new()
            .allow(col::REGION, ["West"])
            .apply(&dataset)
            .unwrap();
        let records = view.records(&dataset).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].order_id, "US-001");
        assert_eq!(records[1].sales_price, 30.0);
    }

    #[test]
    fn intersect_sorted_basics() {
        assert_eq!(intersect_sorted(vec![0, 2, 4], vec![2, 3, 4]), vec![2, 4]);
        assert_eq!(intersect_sorted(vec![], vec![1]), Vec::<usize>::new());
    }
}
