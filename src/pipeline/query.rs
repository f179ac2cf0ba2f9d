use lru::LruCache;
use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::rc::Rc;

use crate::pipeline::aggregate;
use crate::pipeline::dataset::SalesDataset;
use crate::pipeline::filter::{FilteredView, Selection};
use crate::pipeline::{AggregateOp, AggregateResult, AnalyticsError, OperationResult};

/// Cache key for one pipeline operation. The selection is part of every
/// key, so results for different filter states never collide.
#[derive(Hash, Eq, PartialEq, Clone)]
pub enum QueryKey {
    Filter {
        selection: Selection,
    },
    Aggregate {
        selection: Selection,
        measure: String,
        op: AggregateOp,
    },
    GroupBy {
        selection: Selection,
        group_dim: String,
        measure: String,
        op: AggregateOp,
    },
}

pub struct QueryCache {
    cache: RefCell<LruCache<QueryKey, OperationResult>>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.cache.borrow().len())
            .finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            cache: RefCell::new(LruCache::new(
                NonZeroUsize::new(128).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<OperationResult> {
        self.cache.borrow().peek(key).cloned()
    }

    pub fn put(&self, key: QueryKey, value: OperationResult) {
        self.cache.borrow_mut().put(key, value);
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a selection, via the cache when one is attached.
pub fn filtered_view(
    dataset: &SalesDataset,
    selection: &Selection,
    cache: Option<&Rc<QueryCache>>,
) -> Result<FilteredView, AnalyticsError> {
    match cache {
        Some(lru) => {
            let key = QueryKey::Filter {
                selection: selection.clone(),
            };
            if let Some(OperationResult::Filter(rows)) = lru.get(&key) {
                return Ok(FilteredView::from_rows(rows));
            }
            let view = selection.apply(dataset)?;
            lru.put(key, OperationResult::Filter(view.rows().to_vec()));
            Ok(view)
        }
        None => selection.apply(dataset),
    }
}

/// Query results in the shapes the dashboard widgets consume.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Single aggregation result
    Aggregate(AggregateResult),
    /// Multiple aggregation results, keyed by alias
    MultiAggregate(HashMap<String, AggregateResult>),
    /// Single group-by dimension with single aggregation
    GroupBy(HashMap<String, AggregateResult>),
    /// Single group-by dimension with multiple aggregations
    GroupByMultiAgg(HashMap<String, HashMap<String, AggregateResult>>),
}

/// Builder for one filtered, optionally grouped aggregation pass.
#[derive(Debug)]
pub struct DashboardQuery {
    dataset: Rc<SalesDataset>,
    cache: Option<Rc<QueryCache>>,
    selection: Selection,
    group_dim: Option<String>,
    aggregations: Vec<(String, AggregateOp, Option<String>)>, // (measure, op, alias)
}

impl Clone for DashboardQuery {
    fn clone(&self) -> Self {
        DashboardQuery {
            dataset: Rc::clone(&self.dataset),
            cache: self.cache.as_ref().map(Rc::clone),
            selection: self.selection.clone(),
            group_dim: self.group_dim.clone(),
            aggregations: self.aggregations.clone(),
        }
    }
}

impl DashboardQuery {
    pub fn new(dataset: Rc<SalesDataset>, cache: Option<Rc<QueryCache>>) -> Self {
        Self {
            dataset,
            cache,
            selection: Selection::new(),
            group_dim: None,
            aggregations: Vec::new(),
        }
    }

    /// Filters rows through the given selection
    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Groups results along one categorical dimension
    pub fn group_by(mut self, dimension: &str) -> Self {
        self.group_dim = Some(dimension.to_string());
        self
    }

    /// Add an aggregation
    pub fn aggregate(mut self, measure: &str, op: AggregateOp) -> Self {
        self.aggregations.push((measure.to_string(), op, None));
        self
    }

    /// Add an aggregation with a custom alias
    pub fn aggregate_as(mut self, measure: &str, op: AggregateOp, alias: &str) -> Self {
        self.aggregations
            .push((measure.to_string(), op, Some(alias.to_string())));
        self
    }

    /// Disable caching
    pub fn no_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Execute the query
    pub fn execute(self) -> Result<QueryResult, AnalyticsError> {
        let view = filtered_view(&self.dataset, &self.selection, self.cache.as_ref())?;

        match (self.group_dim.as_deref(), self.aggregations.len()) {
            (None, 1) => {
                let (measure, op, _) = &self.aggregations[0];
                let result = self.cached_aggregate(&view, measure, *op)?;
                Ok(QueryResult::Aggregate(result))
            }

            (None, n) if n > 1 => {
                let mut results = HashMap::new();
                for (measure, op, alias) in &self.aggregations {
                    let result = self.cached_aggregate(&view, measure, *op)?;
                    results.insert(metric_name(measure, *op, alias), result);
                }
                Ok(QueryResult::MultiAggregate(results))
            }

            (Some(dim), 1) => {
                let (measure, op, _) = &self.aggregations[0];
                let result = self.cached_group_by(&view, dim, measure, *op)?;
                Ok(QueryResult::GroupBy(result))
            }

            (Some(dim), n) if n > 1 => {
                let mut result: HashMap<String, HashMap<String, AggregateResult>> = HashMap::new();
                for (measure, op, alias) in &self.aggregations {
                    let grouped = self.cached_group_by(&view, dim, measure, *op)?;
                    let name = metric_name(measure, *op, alias);
                    for (key, value) in grouped {
                        result.entry(key).or_default().insert(name.clone(), value);
                    }
                }
                Ok(QueryResult::GroupByMultiAgg(result))
            }

            _ => Err(AnalyticsError::Parse(
                "query needs at least one aggregation".into(),
            )),
        }
    }

    fn cached_aggregate(
        &self,
        view: &FilteredView,
        measure: &str,
        op: AggregateOp,
    ) -> Result<AggregateResult, AnalyticsError> {
        match &self.cache {
            Some(lru) => {
                let key = QueryKey::Aggregate {
                    selection: self.selection.clone(),
                    measure: measure.to_string(),
                    op,
                };
                if let Some(OperationResult::Aggregate(result)) = lru.get(&key) {
                    return Ok(result);
                }
                let result = aggregate::aggregate_measure(&self.dataset, view, measure, op)?;
                lru.put(key, OperationResult::Aggregate(result.clone()));
                Ok(result)
            }
            None => aggregate::aggregate_measure(&self.dataset, view, measure, op),
        }
    }

    fn cached_group_by(
        &self,
        view: &FilteredView,
        group_dim: &str,
        measure: &str,
        op: AggregateOp,
    ) -> Result<HashMap<String, AggregateResult>, AnalyticsError> {
        match &self.cache {
            Some(lru) => {
                let key = QueryKey::GroupBy {
                    selection: self.selection.clone(),
                    group_dim: group_dim.to_string(),
                    measure: measure.to_string(),
                    op,
                };
                if let Some(OperationResult::GroupBy(result)) = lru.get(&key) {
                    return Ok(result);
                }
                let result = aggregate::grouped(&self.dataset, view, group_dim, measure, op)?;
                lru.put(key, OperationResult::GroupBy(result.clone()));
                Ok(result)
            }
            None => aggregate::grouped(&self.dataset, view, group_dim, measure, op),
        }
    }
}

fn metric_name(measure: &str, op: AggregateOp, alias: &Option<String>) -> String {
    alias
        .clone()
        .unwrap_or_else(|| format!("{}_{:?}", measure, op).to_lowercase())
}

impl SalesDataset {
    pub fn query(self: &Rc<Self>) -> DashboardQuery {
        DashboardQuery::new(Rc::clone(self), None)
    }

    pub fn query_with_cache(self: &Rc<Self>, cache: &Rc<QueryCache>) -> DashboardQuery {
        DashboardQuery::new(Rc::clone(self), Some(Rc::clone(cache)))
    }
}
