use crate::utils::sample_csv_path;
use sales_analytics::pipeline::dataset::{col, SalesDataset};
use sales_analytics::pipeline::filter::Selection;
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();

    let mut dataset = SalesDataset::new();
    dataset.load_csv(path.as_path())?;

    // Keep West-region consumer orders only
    let view = Selection::new()
        .allow(col::REGION, ["West"])
        .allow(col::SEGMENT, ["Consumer"])
        .apply(&dataset)?;

    println!("Matching rows: {:?}", view.rows());
    for record in view.records(&dataset)? {
        println!(
            "{} | {} | {:.2}",
            record.order_id, record.product_name, record.sales_price
        );
    }
    Ok(())
}
