use std::collections::HashMap;
use thiserror::Error;

pub mod aggregate;
pub mod column;
pub mod dataset;
pub mod filter;
pub mod query;

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Column '{column}' is not a {expected} column")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    #[error("Schema/parse error: {0}")]
    Parse(String),

    #[error("Mmap not loaded")]
    MmapNotLoaded,
}

/// Outcome of a dataset load. Cell-level problems never fail the load;
/// they are collected here for the caller to inspect.
#[derive(Debug)]
pub struct LoadSummary {
    pub rows_loaded: usize,
    pub null_order_dates: usize,
    pub null_ship_dates: usize,
    pub errors: Vec<RowError>,
}

/// A cell or row that could not be parsed as declared.
#[derive(Debug, Clone)]
pub struct RowError {
    /// Byte offset of the offending line within the source file.
    pub offset: usize,
    pub column: String,
    pub value: String,
    pub reason: String,
}

/// Aggregate operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateOp {
    /// Sum of all numeric values
    Sum,
    /// Count of all rows
    Count,
    /// Average of numeric values
    Avg,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
}

/// Result of an aggregation
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateResult {
    Int(i64),
    Float(f64),
}

impl AggregateResult {
    pub fn as_f64(&self) -> f64 {
        match self {
            AggregateResult::Int(v) => *v as f64,
            AggregateResult::Float(v) => *v,
        }
    }
}

#[derive(Debug, Clone)]
pub enum OperationResult {
    Filter(Vec<usize>),
    Aggregate(AggregateResult),
    GroupBy(HashMap<String, AggregateResult>),
    GroupByMultiAgg(HashMap<String, HashMap<String, AggregateResult>>),
}
