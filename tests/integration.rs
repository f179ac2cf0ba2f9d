use std::io::Write;
use std::rc::Rc;

use tempfile::NamedTempFile;

use sales_analytics::dashboard::build_snapshot;
use sales_analytics::pipeline::dataset::{col, DatasetCache, SalesDataset};
use sales_analytics::pipeline::filter::Selection;
use sales_analytics::pipeline::query::{QueryCache, QueryResult};
use sales_analytics::pipeline::{AggregateOp, AggregateResult, AnalyticsError};

const HEADER: &str = "Order ID,Order Date,Ship Date,Region,Segment,Category,Sub-Category,Product Name,Sales Price,Original Price,Profit,Quantity,Discount,Ship Mode,Shipping Urgency,Days to Ship";

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    writeln!(tmp, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(tmp, "{}", row).unwrap();
    }
    tmp
}

fn three_region_rows() -> Vec<&'static str> {
    vec![
        "A-1,2024-01-15,2024-01-16,West,Consumer,Technology,Phones,Phone,100,110,20,1,0.1,First Class,Urgent,1",
        "A-2,2024-01-20,2024-01-22,East,Consumer,Technology,Phones,Phone,50,55,8,1,0.1,Second Class,Urgent,2",
        "A-3,2024-03-05,2024-03-05,West,Corporate,Furniture,Chairs,Chair,30,40,-3,2,0.2,Same Day,Immediate,0",
    ]
}

#[test]
fn west_selection_matches_the_worked_example() {
    let tmp = csv_file(&three_region_rows());
    let mut dataset = SalesDataset::new();
    dataset.load_csv(tmp.path()).unwrap();

    let view = Selection::new()
        .allow(col::REGION, ["West"])
        .apply(&dataset)
        .unwrap();
    assert_eq!(view.len(), 2);

    let dataset = Rc::new(dataset);
    let result = dataset
        .query()
        .select(Selection::new().allow(col::REGION, ["West"]))
        .aggregate(col::SALES_PRICE, AggregateOp::Sum)
        .execute()
        .unwrap();
    assert_eq!(result, QueryResult::Aggregate(AggregateResult::Float(130.0)));
}

#[test]
fn snapshot_end_to_end_over_full_domain() {
    let tmp = csv_file(&three_region_rows());
    let datasets = DatasetCache::new();
    let dataset = datasets.load(tmp.path()).unwrap();

    let selection = Selection::full_domain(&dataset).unwrap();
    let cache = Rc::new(QueryCache::new());
    let snapshot = build_snapshot(&dataset, &selection, Some(&cache)).unwrap();

    assert_eq!(snapshot.filtered_rows, 3);
    assert_eq!(snapshot.kpis.total_sales, 180.0);
    assert_eq!(snapshot.kpis.total_profit, 25.0);
    assert_eq!(snapshot.kpis.total_orders, 3);

    // January and March orders with a silent February in between
    assert_eq!(snapshot.monthly_sales.len(), 3);
    assert_eq!(snapshot.monthly_sales[0].1, 150.0);
    assert_eq!(snapshot.monthly_sales[1].1, 0.0);
    assert_eq!(snapshot.monthly_sales[2].1, 30.0);

    // Rebuilding from the same cache changes nothing
    let again = build_snapshot(&dataset, &selection, Some(&cache)).unwrap();
    assert_eq!(snapshot, again);
}

#[test]
fn dataset_cache_shares_one_parse_per_path() {
    let tmp = csv_file(&three_region_rows());
    let datasets = DatasetCache::new();

    let first = datasets.load(tmp.path()).unwrap();
    let second = datasets.load(tmp.path()).unwrap();
    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn missing_required_column_fails_the_load() {
    let mut tmp = NamedTempFile::new().unwrap();
    writeln!(tmp, "Order ID,Order Date,Region").unwrap();
    writeln!(tmp, "A-1,2024-01-15,West").unwrap();

    let mut dataset = SalesDataset::new();
    let err = dataset.load_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, AnalyticsError::MissingColumn(_)));
}

#[test]
fn null_order_dates_survive_the_load_but_skip_time_buckets() {
    let mut rows = three_region_rows();
    rows.push(
        "A-4,bad-date,2024-03-10,South,Consumer,Furniture,Tables,Table,500,600,50,1,0.1,Standard Class,Standard,4",
    );
    let tmp = csv_file(&rows);

    let mut dataset = SalesDataset::new();
    let summary = dataset.load_csv(tmp.path()).unwrap();
    assert_eq!(summary.rows_loaded, 4);
    assert_eq!(summary.null_order_dates, 1);

    let dataset = Rc::new(dataset);
    let selection = Selection::new();
    let snapshot = build_snapshot(&dataset, &selection, None).unwrap();

    // The row counts toward every non-time aggregate
    assert_eq!(snapshot.filtered_rows, 4);
    assert_eq!(snapshot.kpis.total_sales, 680.0);
    // but not toward the monthly trend
    let monthly_total: f64 = snapshot.monthly_sales.iter().map(|(_, v)| v).sum();
    assert_eq!(monthly_total, 180.0);
}

#[test]
fn deselecting_every_value_empties_the_dashboard() {
    let tmp = csv_file(&three_region_rows());
    let mut dataset = SalesDataset::new();
    dataset.load_csv(tmp.path()).unwrap();
    let dataset = Rc::new(dataset);

    let selection = Selection::full_domain(&dataset)
        .unwrap()
        .allow(col::CATEGORY, Vec::<String>::new());
    let snapshot = build_snapshot(&dataset, &selection, None).unwrap();

    assert_eq!(snapshot.filtered_rows, 0);
    assert_eq!(snapshot.kpis.total_sales, 0.0);
    assert!(snapshot.monthly_sales.is_empty());
    assert!(snapshot.product_metrics.is_empty());
    assert!(snapshot.sales_profit_fit.is_none());
}

#[test]
fn filtered_view_exports_to_arrow() {
    let tmp = csv_file(&three_region_rows());
    let mut dataset = SalesDataset::new();
    dataset.load_csv(tmp.path()).unwrap();

    let view = Selection::new()
        .allow(col::REGION, ["West"])
        .apply(&dataset)
        .unwrap();
    let (schema, chunk) = dataset.to_arrow(Some(view.rows())).unwrap();
    assert_eq!(schema.fields.len(), 16);
    assert_eq!(chunk.len(), 2);
}
