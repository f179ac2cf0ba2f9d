//! # sales-analytics
//!
//! `sales-analytics` is the filter-and-aggregate core behind a sales
//! dashboard. It loads a superstore-style CSV export into immutable
//! columnar storage, applies user filter selections, and computes the
//! aggregates the rendering side draws:
//!
//! - Memory-mapped CSV loading with parallel parsing
//! - A declared schema with multi-format date parsing (bad dates load
//!   as nulls, never as failures)
//! - Multi-dimension categorical filtering (AND across dimensions, OR
//!   within one)
//! - Group-by sums, means and counts, distinct order counts, top/bottom
//!   products, month-end time buckets, shipping-class bins
//! - Per-product totals with a least-squares profit/sales fit
//! - LRU-cached query results keyed by filter selection
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use sales_analytics::dashboard::build_snapshot;
//! use sales_analytics::pipeline::dataset::SalesDataset;
//! use sales_analytics::pipeline::filter::Selection;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut dataset = SalesDataset::new();
//!     dataset.load_csv("superstore.csv".as_ref())?;
//!     let dataset = Rc::new(dataset);
//!
//!     let selection = Selection::full_domain(&dataset)?
//!         .allow("Region", ["West", "East"]);
//!     let snapshot = build_snapshot(&dataset, &selection, None)?;
//!     println!("total sales: {}", snapshot.kpis.total_sales);
//!     Ok(())
//! }
//! ```

pub mod dashboard;
pub mod pipeline;
