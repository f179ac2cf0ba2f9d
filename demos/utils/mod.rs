use std::path::PathBuf;

const SAMPLE_CSV: &str = "\
Order ID,Order Date,Ship Date,Region,Segment,Category,Sub-Category,Product Name,Sales Price,Original Price,Profit,Quantity,Discount,Ship Mode,Shipping Urgency,Days to Ship
US-001,2024-01-05,2024-01-05,West,Consumer,Technology,Phones,\"Apple iPhone 14, 128GB\",899,999,120,1,0.1,Same Day,Immediate,0
US-002,2024-01-12,2024-01-14,East,Corporate,Furniture,Chairs,Ergonomic Desk Chair,240,300,35,2,0.2,Second Class,Urgent,2
US-003,2024-02-03,2024-02-08,West,Consumer,Office Supplies,Paper,Recycled Copy Paper,25,25,6,5,0.0,Standard Class,Standard,5
US-004,2024-02-20,2024-02-22,Central,Home Office,Technology,Accessories,Logitech Wireless Mouse,45,50,12,1,0.1,First Class,Urgent,2
US-005,2024-03-15,2024-03-21,South,Corporate,Furniture,Tables,\"Conference Table, Oak\",1200,1500,-80,1,0.2,Standard Class,Standard,6
US-005,2024-03-15,2024-03-21,South,Corporate,Office Supplies,Binders,3-Ring Binder,12,15,3,4,0.2,Standard Class,Standard,6
";

/// Writes the bundled sample CSV to the temp dir and returns its path.
pub fn sample_csv_path() -> PathBuf {
    let path = std::env::temp_dir().join("sales_analytics_demo.csv");
    std::fs::write(&path, SAMPLE_CSV).expect("cannot write demo CSV");
    path
}
