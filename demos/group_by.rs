use crate::utils::sample_csv_path;
use sales_analytics::pipeline::aggregate::grouped;
use sales_analytics::pipeline::dataset::{col, SalesDataset};
use sales_analytics::pipeline::filter::FilteredView;
use sales_analytics::pipeline::AggregateOp;
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();

    let mut dataset = SalesDataset::new();
    dataset.load_csv(path.as_path())?;
    let view = FilteredView::all(&dataset);

    // Total sales per category
    let sums = grouped(
        &dataset,
        &view,
        col::CATEGORY,
        col::SALES_PRICE,
        AggregateOp::Sum,
    )?;
    for (category, total) in &sums {
        println!("{} => {:?}", category, total);
    }

    // Average profit per region
    let avgs = grouped(&dataset, &view, col::REGION, col::PROFIT, AggregateOp::Avg)?;
    for (region, avg) in &avgs {
        println!("{} => {:?}", region, avg);
    }
    Ok(())
}
