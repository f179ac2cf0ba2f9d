use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use jemallocator::Jemalloc;
use sales_analytics::dashboard;
use sales_analytics::pipeline::dataset::DatasetCache;
use sales_analytics::pipeline::filter::Selection;
use sales_analytics::pipeline::query::QueryCache;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: sales-analytics <sales.csv>");
        return ExitCode::FAILURE;
    };

    match run(path.as_ref()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let datasets = DatasetCache::new();
    let dataset = datasets.load(path)?;

    // Full observed domains, the dashboards' default filter state
    let selection = Selection::full_domain(&dataset)?;
    let cache = Rc::new(QueryCache::new());
    let snapshot = dashboard::build_snapshot(&dataset, &selection, Some(&cache))?;

    Ok(serde_json::to_string_pretty(&snapshot)?)
}
