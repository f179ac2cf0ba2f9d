//! One-shot composition of the pipeline into everything the rendering
//! side draws. A selection change rebuilds the whole snapshot; nothing
//! here holds state between calls.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::pipeline::aggregate::{self, LinearFit, MeasureSummary, ProductMetrics, ShipClass};
use crate::pipeline::dataset::{col, SalesDataset};
use crate::pipeline::filter::Selection;
use crate::pipeline::query::{filtered_view, DashboardQuery, QueryCache, QueryResult};
use crate::pipeline::{AggregateOp, AggregateResult, AnalyticsError};

/// Measures summarized in the dataset-overview table.
const SUMMARY_MEASURES: [&str; 4] = [
    col::SALES_PRICE,
    col::QUANTITY,
    col::DISCOUNT,
    col::PROFIT,
];

/// Chart rows for the top/bottom product listings.
const TOP_PRODUCTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub total_sales: f64,
    pub total_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceComparison {
    pub sub_category: String,
    pub avg_original_price: f64,
    pub avg_sales_price: f64,
}

/// Every aggregate the dashboards render, computed over one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub filtered_rows: usize,
    pub kpis: Kpis,
    pub summary_stats: BTreeMap<String, MeasureSummary>,
    pub sales_by_category: Vec<(String, f64)>,
    pub profit_by_region: Vec<(String, f64)>,
    pub monthly_sales: Vec<(NaiveDate, f64)>,
    pub top_profit_products: Vec<(String, f64)>,
    pub top_loss_products: Vec<(String, f64)>,
    pub product_metrics: Vec<ProductMetrics>,
    pub sales_profit_fit: Option<LinearFit>,
    pub urgency_counts: Vec<(String, usize)>,
    pub profit_by_ship_class: BTreeMap<ShipClass, Vec<f64>>,
    pub profit_by_ship_mode: Vec<(String, f64)>,
    pub region_summary: Vec<RegionSummary>,
    pub price_by_sub_category: Vec<PriceComparison>,
}

/// Runs load -> filter -> aggregate once and returns the full snapshot.
///
/// With a cache attached, the filtered view and every plain aggregate
/// are reused across rebuilds with an unchanged selection.
pub fn build_snapshot(
    dataset: &Rc<SalesDataset>,
    selection: &Selection,
    cache: Option<&Rc<QueryCache>>,
) -> Result<DashboardSnapshot, AnalyticsError> {
    let view = filtered_view(dataset, selection, cache)?;
    log::debug!(
        "rebuilding snapshot over {} of {} rows",
        view.len(),
        dataset.row_count()
    );

    let kpi_result = query(dataset, cache, selection)
        .aggregate_as(col::SALES_PRICE, AggregateOp::Sum, "total_sales")
        .aggregate_as(col::PROFIT, AggregateOp::Sum, "total_profit")
        .execute()?;
    let (total_sales, total_profit) = match kpi_result {
        QueryResult::MultiAggregate(map) => (as_f64(&map, "total_sales"), as_f64(&map, "total_profit")),
        _ => (0.0, 0.0),
    };
    let kpis = Kpis {
        total_sales,
        total_profit,
        total_orders: aggregate::count_distinct(dataset, &view, col::ORDER_ID)?,
    };

    let mut summary_stats = BTreeMap::new();
    for measure in SUMMARY_MEASURES {
        summary_stats.insert(
            measure.to_string(),
            aggregate::summary_stats(dataset, &view, measure)?,
        );
    }

    let sales_by_category =
        grouped_sum_sorted(dataset, cache, selection, col::CATEGORY, col::SALES_PRICE)?;
    let profit_by_region =
        grouped_sum_sorted(dataset, cache, selection, col::REGION, col::PROFIT)?;
    let profit_by_ship_mode =
        grouped_sum_sorted(dataset, cache, selection, col::SHIP_MODE, col::PROFIT)?;

    let monthly_sales = aggregate::monthly_totals(dataset, &view, col::SALES_PRICE)?;

    let top_profit_products =
        aggregate::top_k(dataset, &view, col::PRODUCT_NAME, col::PROFIT, TOP_PRODUCTS)?;
    let top_loss_products =
        aggregate::bottom_k(dataset, &view, col::PRODUCT_NAME, col::PROFIT, TOP_PRODUCTS)?;

    let product_metrics = aggregate::product_metrics(dataset, &view)?;
    let sales_profit_fit = aggregate::sales_profit_fit(&product_metrics);

    let mut urgency_counts: Vec<(String, usize)> = aggregate::urgency_counts(dataset, &view)?
        .into_iter()
        .collect();
    urgency_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let profit_by_ship_class = aggregate::profit_by_ship_class(dataset, &view)?;

    let region_result = query(dataset, cache, selection)
        .group_by(col::REGION)
        .aggregate_as(col::SALES_PRICE, AggregateOp::Sum, "total_sales")
        .aggregate_as(col::PROFIT, AggregateOp::Sum, "total_profit")
        .execute()?;
    let region_summary = match region_result {
        QueryResult::GroupByMultiAgg(map) => {
            let mut rows: Vec<RegionSummary> = map
                .into_iter()
                .map(|(region, metrics)| RegionSummary {
                    region,
                    total_sales: as_f64(&metrics, "total_sales"),
                    total_profit: as_f64(&metrics, "total_profit"),
                })
                .collect();
            rows.sort_by(|a, b| a.region.cmp(&b.region));
            rows
        }
        _ => Vec::new(),
    };

    let price_result = query(dataset, cache, selection)
        .group_by(col::SUB_CATEGORY)
        .aggregate_as(col::ORIGINAL_PRICE, AggregateOp::Avg, "avg_original_price")
        .aggregate_as(col::SALES_PRICE, AggregateOp::Avg, "avg_sales_price")
        .execute()?;
    let price_by_sub_category = match price_result {
        QueryResult::GroupByMultiAgg(map) => {
            let mut rows: Vec<PriceComparison> = map
                .into_iter()
                .map(|(sub_category, metrics)| PriceComparison {
                    sub_category,
                    avg_original_price: as_f64(&metrics, "avg_original_price"),
                    avg_sales_price: as_f64(&metrics, "avg_sales_price"),
                })
                .collect();
            rows.sort_by(|a, b| a.sub_category.cmp(&b.sub_category));
            rows
        }
        _ => Vec::new(),
    };

    Ok(DashboardSnapshot {
        filtered_rows: view.len(),
        kpis,
        summary_stats,
        sales_by_category,
        profit_by_region,
        monthly_sales,
        top_profit_products,
        top_loss_products,
        product_metrics,
        sales_profit_fit,
        urgency_counts,
        profit_by_ship_class,
        profit_by_ship_mode,
        region_summary,
        price_by_sub_category,
    })
}

fn query(
    dataset: &Rc<SalesDataset>,
    cache: Option<&Rc<QueryCache>>,
    selection: &Selection,
) -> DashboardQuery {
    let q = match cache {
        Some(c) => dataset.query_with_cache(c),
        None => dataset.query(),
    };
    q.select(selection.clone())
}

/// Grouped sum rendered bar-chart style: largest group first.
fn grouped_sum_sorted(
    dataset: &Rc<SalesDataset>,
    cache: Option<&Rc<QueryCache>>,
    selection: &Selection,
    dimension: &str,
    measure: &str,
) -> Result<Vec<(String, f64)>, AnalyticsError> {
    let result = query(dataset, cache, selection)
        .group_by(dimension)
        .aggregate(measure, AggregateOp::Sum)
        .execute()?;
    match result {
        QueryResult::GroupBy(map) => {
            let mut entries: Vec<(String, f64)> = map
                .into_iter()
                .map(|(key, value)| (key, value.as_f64()))
                .collect();
            entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            Ok(entries)
        }
        _ => Err(AnalyticsError::Parse("unexpected query result shape".into())),
    }
}

fn as_f64(metrics: &HashMap<String, AggregateResult>, name: &str) -> f64 {
    metrics.get(name).map(AggregateResult::as_f64).unwrap_or(0.0)
}
