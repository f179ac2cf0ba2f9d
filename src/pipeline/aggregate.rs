//! Grouped and derived aggregations over a filtered view.
//!
//! Every function here is pure with respect to the dataset: it reads the
//! columns, never mutates, and allocates a fresh result per call.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::pipeline::column::Column;
use crate::pipeline::dataset::{col, SalesDataset};
use crate::pipeline::filter::FilteredView;
use crate::pipeline::{AggregateOp, AggregateResult, AnalyticsError};

/// Group-by aggregation of one measure along one categorical dimension.
///
/// Integer measures keep integer results where the operation allows it,
/// mirroring the column types of the source file.
pub fn grouped(
    dataset: &SalesDataset,
    view: &FilteredView,
    group_dim: &str,
    measure: &str,
    op: AggregateOp,
) -> Result<HashMap<String, AggregateResult>, AnalyticsError> {
    let keys = dataset.str_offsets(group_dim)?;
    let measure_col = dataset.get_col(measure)?;

    match measure_col {
        Column::I64(_) => {
            let values: Vec<i64> = measure_col.iter_i64().collect();
            let mut groups: HashMap<String, Vec<i64>> = HashMap::new();
            for &row in view.rows() {
                let (start, end) = keys[row];
                let key = dataset.str_value(start, end)?.to_string();
                groups.entry(key).or_default().push(values[row]);
            }

            let mut out = HashMap::new();
            for (key, group_values) in groups {
                out.insert(key, aggregate_int_values(&group_values, op)?);
            }
            Ok(out)
        }
        Column::F64(_) => {
            let values: Vec<f64> = measure_col.iter_f64().collect();
            let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
            for &row in view.rows() {
                let (start, end) = keys[row];
                let key = dataset.str_value(start, end)?.to_string();
                groups.entry(key).or_default().push(values[row]);
            }

            let mut out = HashMap::new();
            for (key, group_values) in groups {
                out.insert(key, aggregate_float_values(&group_values, op)?);
            }
            Ok(out)
        }
        _ => Err(AnalyticsError::ColumnType {
            column: measure.to_string(),
            expected: "numeric",
        }),
    }
}

/// Ungrouped aggregation of one measure over the view. An empty view
/// reports zero rather than failing; a dashboard with every value
/// deselected still renders.
pub fn aggregate_measure(
    dataset: &SalesDataset,
    view: &FilteredView,
    measure: &str,
    op: AggregateOp,
) -> Result<AggregateResult, AnalyticsError> {
    let column = dataset.get_col(measure)?;

    match column {
        Column::I64(_) => {
            let all: Vec<i64> = column.iter_i64().collect();
            let values: Vec<i64> = view.rows().iter().map(|&i| all[i]).collect();
            if values.is_empty() {
                return Ok(zero_result(op, true));
            }
            aggregate_int_values(&values, op)
        }
        Column::F64(_) => {
            let all: Vec<f64> = column.iter_f64().collect();
            let values: Vec<f64> = view.rows().iter().map(|&i| all[i]).collect();
            if values.is_empty() {
                return Ok(zero_result(op, false));
            }
            aggregate_float_values(&values, op)
        }
        _ => Err(AnalyticsError::ColumnType {
            column: measure.to_string(),
            expected: "numeric",
        }),
    }
}

fn zero_result(op: AggregateOp, integer: bool) -> AggregateResult {
    match op {
        AggregateOp::Count => AggregateResult::Int(0),
        AggregateOp::Avg => AggregateResult::Float(0.0),
        _ if integer => AggregateResult::Int(0),
        _ => AggregateResult::Float(0.0),
    }
}

/// Helper to aggregate integer values
pub(crate) fn aggregate_int_values(
    values: &[i64],
    op: AggregateOp,
) -> Result<AggregateResult, AnalyticsError> {
    if values.is_empty() {
        return Err(AnalyticsError::Parse("cannot aggregate empty values".into()));
    }

    match op {
        AggregateOp::Sum => Ok(AggregateResult::Int(values.iter().sum())),
        AggregateOp::Count => Ok(AggregateResult::Int(values.len() as i64)),
        AggregateOp::Avg => {
            let sum: i64 = values.iter().sum();
            Ok(AggregateResult::Float(sum as f64 / values.len() as f64))
        }
        AggregateOp::Min => Ok(AggregateResult::Int(
            values.iter().copied().min().unwrap_or(0),
        )),
        AggregateOp::Max => Ok(AggregateResult::Int(
            values.iter().copied().max().unwrap_or(0),
        )),
    }
}

/// Helper to aggregate float values
pub(crate) fn aggregate_float_values(
    values: &[f64],
    op: AggregateOp,
) -> Result<AggregateResult, AnalyticsError> {
    if values.is_empty() {
        return Err(AnalyticsError::Parse("cannot aggregate empty values".into()));
    }

    match op {
        AggregateOp::Sum => Ok(AggregateResult::Float(values.iter().sum())),
        AggregateOp::Count => Ok(AggregateResult::Int(values.len() as i64)),
        AggregateOp::Avg => {
            let sum: f64 = values.iter().sum();
            Ok(AggregateResult::Float(sum / values.len() as f64))
        }
        AggregateOp::Min => Ok(AggregateResult::Float(
            values.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
        )),
        AggregateOp::Max => Ok(AggregateResult::Float(
            values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        )),
    }
}

/// Number of distinct values of a string column within the view; the
/// order-count KPI is a distinct count over order ids.
pub fn count_distinct(
    dataset: &SalesDataset,
    view: &FilteredView,
    column: &str,
) -> Result<usize, AnalyticsError> {
    let offsets = dataset.str_offsets(column)?;
    let mut seen: HashSet<&[u8]> = HashSet::with_capacity(view.len());
    for &row in view.rows() {
        let (start, end) = offsets[row];
        seen.insert(dataset.slice_bytes(start, end)?);
    }
    Ok(seen.len())
}

/// Per-group sums of a measure, as plain floats.
pub fn grouped_sums(
    dataset: &SalesDataset,
    view: &FilteredView,
    group_dim: &str,
    measure: &str,
) -> Result<HashMap<String, f64>, AnalyticsError> {
    let keys = dataset.str_offsets(group_dim)?;
    let values = dataset.measure_values(measure)?;

    let mut out: HashMap<String, f64> = HashMap::new();
    for &row in view.rows() {
        let (start, end) = keys[row];
        *out.entry(dataset.str_value(start, end)?.to_string())
            .or_insert(0.0) += values[row];
    }
    Ok(out)
}

/// The k groups with the largest summed measure, descending. Ties break
/// on the group name so results are deterministic.
pub fn top_k(
    dataset: &SalesDataset,
    view: &FilteredView,
    group_dim: &str,
    measure: &str,
    k: usize,
) -> Result<Vec<(String, f64)>, AnalyticsError> {
    let mut entries: Vec<(String, f64)> =
        grouped_sums(dataset, view, group_dim, measure)?.into_iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(k);
    Ok(entries)
}

/// The k groups with the smallest summed measure, ascending.
pub fn bottom_k(
    dataset: &SalesDataset,
    view: &FilteredView,
    group_dim: &str,
    measure: &str,
    k: usize,
) -> Result<Vec<(String, f64)>, AnalyticsError> {
    let mut entries: Vec<(String, f64)> =
        grouped_sums(dataset, view, group_dim, measure)?.into_iter().collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(k);
    Ok(entries)
}

/// The terminal day of a date's calendar month.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    // Only the chrono year bound has no successor month
    first_of_next.and_then(|d| d.pred_opt()).unwrap_or(date)
}

/// Sums a measure into month-end buckets of the order date. Rows with a
/// null order date carry no bucket and are skipped. Months between the
/// first and last observed bucket appear with a zero total, keeping the
/// time axis dense for trend rendering.
pub fn monthly_totals(
    dataset: &SalesDataset,
    view: &FilteredView,
    measure: &str,
) -> Result<Vec<(NaiveDate, f64)>, AnalyticsError> {
    let dates = dataset.date_values(col::ORDER_DATE)?;
    let values = dataset.measure_values(measure)?;

    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for &row in view.rows() {
        let Some(date) = dates[row] else { continue };
        *buckets.entry(month_end(date)).or_insert(0.0) += values[row];
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    let mut cursor = first;
    loop {
        out.push((cursor, buckets.get(&cursor).copied().unwrap_or(0.0)));
        if cursor >= last {
            break;
        }
        match cursor.succ_opt() {
            Some(next_day) => cursor = month_end(next_day),
            None => break,
        }
    }
    Ok(out)
}

/// Shipping speed classes derived from days-to-ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ShipClass {
    Immediate,
    Urgent,
    Standard,
}

impl ShipClass {
    /// Half-open day bins: (-1, 0], (0, 3], (3, inf).
    ///
    /// A negative value means the shipment was recorded before the
    /// order; it falls outside every bin and classifies to nothing.
    pub fn classify(days_to_ship: i64) -> Option<Self> {
        match days_to_ship {
            d if d < 0 => None,
            0 => Some(ShipClass::Immediate),
            1..=3 => Some(ShipClass::Urgent),
            _ => Some(ShipClass::Standard),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShipClass::Immediate => "Immediate",
            ShipClass::Urgent => "Urgent",
            ShipClass::Standard => "Standard",
        }
    }
}

/// Row counts per value of the Shipping Urgency column.
pub fn urgency_counts(
    dataset: &SalesDataset,
    view: &FilteredView,
) -> Result<HashMap<String, usize>, AnalyticsError> {
    let offsets = dataset.str_offsets(col::SHIPPING_URGENCY)?;
    let mut out: HashMap<String, usize> = HashMap::new();
    for &row in view.rows() {
        let (start, end) = offsets[row];
        *out.entry(dataset.str_value(start, end)?.to_string())
            .or_insert(0) += 1;
    }
    Ok(out)
}

/// Profit values of the view grouped by derived shipping class, the
/// input for distribution rendering. Rows without a class are skipped.
pub fn profit_by_ship_class(
    dataset: &SalesDataset,
    view: &FilteredView,
) -> Result<BTreeMap<ShipClass, Vec<f64>>, AnalyticsError> {
    let days = dataset.i64_values(col::DAYS_TO_SHIP)?;
    let profits = dataset.f64_values(col::PROFIT)?;

    let mut out: BTreeMap<ShipClass, Vec<f64>> = BTreeMap::new();
    for &row in view.rows() {
        let Some(class) = ShipClass::classify(days[row]) else {
            continue;
        };
        out.entry(class).or_default().push(profits[row]);
    }
    Ok(out)
}

/// Per-product totals driving the sales/profit scatter and its fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMetrics {
    pub product_name: String,
    pub total_sales: f64,
    pub total_profit: f64,
}

/// Total sales and total profit per product, ordered by product name.
pub fn product_metrics(
    dataset: &SalesDataset,
    view: &FilteredView,
) -> Result<Vec<ProductMetrics>, AnalyticsError> {
    let names = dataset.str_offsets(col::PRODUCT_NAME)?;
    let sales = dataset.f64_values(col::SALES_PRICE)?;
    let profits = dataset.f64_values(col::PROFIT)?;

    let mut totals: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for &row in view.rows() {
        let (start, end) = names[row];
        let entry = totals
            .entry(dataset.str_value(start, end)?.to_string())
            .or_insert((0.0, 0.0));
        entry.0 += sales[row];
        entry.1 += profits[row];
    }

    Ok(totals
        .into_iter()
        .map(|(product_name, (total_sales, total_profit))| ProductMetrics {
            product_name,
            total_sales,
            total_profit,
        })
        .collect())
}

/// Coefficients of a least-squares line y = slope * x + intercept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Ordinary least squares over the given points. The fit is undefined
/// when fewer than two distinct x values remain, so the caller gets
/// `None` instead of a division by zero.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in points {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Fit of total profit as a function of total sales across products.
pub fn sales_profit_fit(metrics: &[ProductMetrics]) -> Option<LinearFit> {
    let points: Vec<(f64, f64)> = metrics
        .iter()
        .map(|m| (m.total_sales, m.total_profit))
        .collect();
    linear_fit(&points)
}

/// Descriptive statistics of one measure over the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Count, mean, sample standard deviation, min and max of a measure.
/// An empty view reports zeros across the board.
pub fn summary_stats(
    dataset: &SalesDataset,
    view: &FilteredView,
    measure: &str,
) -> Result<MeasureSummary, AnalyticsError> {
    let all = dataset.measure_values(measure)?;
    let values: Vec<f64> = view.rows().iter().map(|&i| all[i]).collect();

    if values.is_empty() {
        return Ok(MeasureSummary {
            count: 0,
            mean: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
        });
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    // Sample standard deviation; zero when a single row remains
    let std = if values.len() > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(MeasureSummary {
        count: values.len(),
        mean,
        std,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::filter::Selection;
    use crate::pipeline::testutil::sample_dataset;

    #[test]
    fn grouped_sum_by_region() {
        let dataset = sample_dataset();
        let view = FilteredView::all(&dataset);
        let sums = grouped(&dataset, &view, col::REGION, col::SALES_PRICE, AggregateOp::Sum)
            .unwrap();
        assert_eq!(sums["West"], AggregateResult::Float(130.0));
        assert_eq!(sums["East"], AggregateResult::Float(50.0));
        assert_eq!(sums["South"], AggregateResult::Float(10.0));
    }

    #[test]
    fn grouped_integer_measure_keeps_integer_results() {
        let dataset = sample_dataset();
        let view = FilteredView::all(&dataset);
        let sums =
            grouped(&dataset, &view, col::REGION, col::QUANTITY, AggregateOp::Sum).unwrap();
        assert_eq!(sums["West"], AggregateResult::Int(2));

        let avgs =
            grouped(&dataset, &view, col::REGION, col::QUANTITY, AggregateOp::Avg).unwrap();
        assert_eq!(avgs["West"], AggregateResult::Float(1.0));
    }

    #[test]
    fn grouped_respects_the_view() {
        let dataset = sample_dataset();
        let view = Selection::new()
            .allow(col::REGION, ["West"])
            .apply(&dataset)
            .unwrap();
        let sums = grouped(&dataset, &view, col::CATEGORY, col::SALES_PRICE, AggregateOp::Sum)
            .unwrap();
        assert_eq!(sums.len(), 1);
        assert_eq!(sums["Technology"], AggregateResult::Float(130.0));
    }

    #[test]
    fn aggregate_measure_reports_zero_on_empty_view() {
        let dataset = sample_dataset();
        let empty = Selection::new()
            .allow(col::REGION, Vec::<String>::new())
            .apply(&dataset)
            .unwrap();
        let sum = aggregate_measure(&dataset, &empty, col::SALES_PRICE, AggregateOp::Sum).unwrap();
        assert_eq!(sum, AggregateResult::Float(0.0));
        let count =
            aggregate_measure(&dataset, &empty, col::QUANTITY, AggregateOp::Count).unwrap();
        assert_eq!(count, AggregateResult::Int(0));
    }

    #[test]
    fn distinct_orders_dedup_repeated_ids() {
        let dataset = sample_dataset();
        let view = FilteredView::all(&dataset);
        // US-003 appears on two rows
        assert_eq!(count_distinct(&dataset, &view, col::ORDER_ID).unwrap(), 3);
    }

    #[test]
    fn top_and_bottom_products_by_profit() {
        let dataset = sample_dataset();
        let view = FilteredView::all(&dataset);

        let top = top_k(&dataset, &view, col::PRODUCT_NAME, col::PROFIT, 2).unwrap();
        assert_eq!(top[0].0, "Apple iPhone 14, 128GB");
        assert_eq!(top[0].1, 26.0);
        assert_eq!(top[1], ("Copy Paper".to_string(), 2.0));

        let bottom = bottom_k(&dataset, &view, col::PRODUCT_NAME, col::PROFIT, 1).unwrap();
        assert_eq!(bottom[0], ("Desk Chair".to_string(), -5.0));
    }

    #[test]
    fn month_end_truncates_to_terminal_day() {
        let jan_15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let jan_31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(month_end(jan_15), jan_31);
        assert_eq!(month_end(jan_31), jan_31);

        let dec = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        assert_eq!(month_end(dec), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        // leap February
        let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(month_end(feb), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn monthly_totals_bucket_and_zero_fill() {
        let dataset = sample_dataset();
        let view = FilteredView::all(&dataset);
        let months = monthly_totals(&dataset, &view, col::SALES_PRICE).unwrap();

        // Jan 15 and Jan 31 share a bucket; February has no rows but
        // still appears; the null-dated row contributes nothing.
        assert_eq!(
            months,
            vec![
                (NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), 150.0),
                (NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(), 0.0),
                (NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(), 30.0),
            ]
        );
    }

    #[test]
    fn monthly_totals_empty_view_is_empty() {
        let dataset = sample_dataset();
        let empty = Selection::new()
            .allow(col::REGION, Vec::<String>::new())
            .apply(&dataset)
            .unwrap();
        assert!(monthly_totals(&dataset, &empty, col::SALES_PRICE)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn ship_class_bins() {
        assert_eq!(ShipClass::classify(0), Some(ShipClass::Immediate));
        assert_eq!(ShipClass::classify(1), Some(ShipClass::Urgent));
        assert_eq!(ShipClass::classify(2), Some(ShipClass::Urgent));
        assert_eq!(ShipClass::classify(3), Some(ShipClass::Urgent));
        assert_eq!(ShipClass::classify(4), Some(ShipClass::Standard));
        assert_eq!(ShipClass::classify(5), Some(ShipClass::Standard));
        assert_eq!(ShipClass::classify(-1), None);
    }

    #[test]
    fn profit_groups_by_derived_ship_class() {
        let dataset = sample_dataset();
        let view = FilteredView::all(&dataset);
        let groups = profit_by_ship_class(&dataset, &view).unwrap();
        assert_eq!(groups[&ShipClass::Immediate], vec![20.0]);
        assert_eq!(groups[&ShipClass::Urgent], vec![-5.0]);
        assert_eq!(groups[&ShipClass::Standard], vec![6.0, 2.0]);
    }

    #[test]
    fn urgency_counts_match_column_values() {
        let dataset = sample_dataset();
        let view = FilteredView::all(&dataset);
        let counts = urgency_counts(&dataset, &view).unwrap();
        assert_eq!(counts["Immediate"], 1);
        assert_eq!(counts["Urgent"], 1);
        assert_eq!(counts["Standard"], 2);
    }

    #[test]
    fn product_metrics_total_per_product() {
        let dataset = sample_dataset();
        let view = FilteredView::all(&dataset);
        let metrics = product_metrics(&dataset, &view).unwrap();
        assert_eq!(metrics.len(), 3);
        // ordered by product name
        assert_eq!(metrics[0].product_name, "Apple iPhone 14, 128GB");
        assert_eq!(metrics[0].total_sales, 130.0);
        assert_eq!(metrics[0].total_profit, 26.0);
    }

    #[test]
    fn linear_fit_recovers_a_line() {
        let fit = linear_fit(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!(fit.intercept.abs() < 1e-12);
    }

    #[test]
    fn linear_fit_is_undefined_on_constant_x() {
        assert_eq!(linear_fit(&[(10.0, 1.0), (10.0, 2.0), (10.0, 3.0)]), None);
        assert_eq!(linear_fit(&[(1.0, 1.0)]), None);
        assert_eq!(linear_fit(&[]), None);
    }

    #[test]
    fn summary_stats_over_sample() {
        let dataset = sample_dataset();
        let view = FilteredView::all(&dataset);
        let stats = summary_stats(&dataset, &view, col::SALES_PRICE).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 47.5);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 100.0);
        assert!(stats.std > 0.0);
    }

    #[test]
    fn summary_stats_empty_view_reports_zeros() {
        let dataset = sample_dataset();
        let empty = Selection::new()
            .allow(col::REGION, Vec::<String>::new())
            .apply(&dataset)
            .unwrap();
        let stats = summary_stats(&dataset, &empty, col::PROFIT).unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
    }
}
