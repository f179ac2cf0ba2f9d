use std::rc::Rc;
use std::time::Instant;

use crate::utils::sample_csv_path;
use sales_analytics::dashboard::build_snapshot;
use sales_analytics::pipeline::dataset::SalesDataset;
use sales_analytics::pipeline::filter::Selection;
use sales_analytics::pipeline::query::QueryCache;
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();

    let mut dataset = SalesDataset::new();
    dataset.load_csv(path.as_path())?;
    let dataset = Rc::new(dataset);

    let selection = Selection::full_domain(&dataset)?;
    let cache = Rc::new(QueryCache::new());

    // First build (filter + every aggregate)
    let start = Instant::now();
    let snapshot = build_snapshot(&dataset, &selection, Some(&cache))?;
    println!(
        "First build: {} rows, total sales {:.2}, elapsed {:?}",
        snapshot.filtered_rows,
        snapshot.kpis.total_sales,
        start.elapsed()
    );

    // Second build (cached view and aggregates)
    let start = Instant::now();
    let cached = build_snapshot(&dataset, &selection, Some(&cache))?;
    println!(
        "Cached build: {} rows, total sales {:.2}, elapsed {:?}",
        cached.filtered_rows,
        cached.kpis.total_sales,
        start.elapsed()
    );

    Ok(())
}
