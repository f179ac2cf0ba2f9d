use chrono::{Days, NaiveDate};
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};

const REGIONS: [&str; 4] = ["West", "East", "Central", "South"];
const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];
const SHIP_MODES: [&str; 4] = ["Same Day", "First Class", "Second Class", "Standard Class"];
const CATALOG: [(&str, &str, &str); 8] = [
    ("Technology", "Phones", "\"Apple iPhone 14, 128GB\""),
    ("Technology", "Accessories", "Logitech Wireless Mouse"),
    ("Technology", "Machines", "Brother Laser Printer"),
    ("Furniture", "Chairs", "Ergonomic Desk Chair"),
    ("Furniture", "Tables", "\"Conference Table, Oak\""),
    ("Office Supplies", "Paper", "Recycled Copy Paper"),
    ("Office Supplies", "Binders", "3-Ring Binder"),
    ("Office Supplies", "Storage", "Stackable File Trays"),
];

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/superstore.csv".to_string());
    let rows: u64 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1_000_000);

    let file = File::create(&path).unwrap();
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "Order ID,Order Date,Ship Date,Region,Segment,Category,Sub-Category,Product Name,Sales Price,Original Price,Profit,Quantity,Discount,Ship Mode,Shipping Urgency,Days to Ship"
    )
    .unwrap();

    let mut rng = rand::rng();
    let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

    for i in 0..rows {
        let (category, sub_category, product) = CATALOG[rng.random_range(0..CATALOG.len())];
        let region = REGIONS[rng.random_range(0..REGIONS.len())];
        let segment = SEGMENTS[rng.random_range(0..SEGMENTS.len())];
        let ship_mode = SHIP_MODES[rng.random_range(0..SHIP_MODES.len())];

        let order_date = base + Days::new(rng.random_range(0..730));
        let days_to_ship: u64 = rng.random_range(0..8);
        let ship_date = order_date + Days::new(days_to_ship);
        let urgency = match days_to_ship {
            0 => "Immediate",
            1..=3 => "Urgent",
            _ => "Standard",
        };

        let original: f64 = rng.random_range(10.0..500.0);
        let discount: f64 = [0.0, 0.1, 0.2, 0.3][rng.random_range(0..4)];
        let sales = original * (1.0 - discount);
        let profit = sales - original * rng.random_range(0.6..1.1);
        let quantity = rng.random_range(1..10);

        writeln!(
            writer,
            "US-{:07},{},{},{},{},{},{},{},{:.2},{:.2},{:.2},{},{},{},{},{}",
            i,
            order_date.format("%Y-%m-%d"),
            ship_date.format("%Y-%m-%d"),
            region,
            segment,
            category,
            sub_category,
            product,
            sales,
            original,
            profit,
            quantity,
            discount,
            ship_mode,
            urgency,
            days_to_ship
        )
        .unwrap();
    }

    println!("Sample sales CSV generated: {} ({} rows)", path, rows);
}
