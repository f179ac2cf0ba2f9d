use arrow2::{
    array::{Array, Float64Array, Int64Array, MutableUtf8Array, PrimitiveArray, Utf8Array},
    chunk::Chunk,
    datatypes::{DataType, Field, Schema},
};
use chrono::NaiveDate;
use memchr::{memchr, memchr_iter};
use memmap2::Mmap;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
    fs::File,
    path::{Path, PathBuf},
    rc::Rc,
    sync::Arc,
};

use crate::pipeline::{
    column::{Column, ColumnType},
    AnalyticsError, LoadSummary, RowError,
};

/// Names of the required input columns.
pub mod col {
    pub const ORDER_ID: &str = "Order ID";
    pub const ORDER_DATE: &str = "Order Date";
    pub const SHIP_DATE: &str = "Ship Date";
    pub const REGION: &str = "Region";
    pub const SEGMENT: &str = "Segment";
    pub const CATEGORY: &str = "Category";
    pub const SUB_CATEGORY: &str = "Sub-Category";
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const SALES_PRICE: &str = "Sales Price";
    pub const ORIGINAL_PRICE: &str = "Original Price";
    pub const PROFIT: &str = "Profit";
    pub const QUANTITY: &str = "Quantity";
    pub const DISCOUNT: &str = "Discount";
    pub const SHIP_MODE: &str = "Ship Mode";
    pub const SHIPPING_URGENCY: &str = "Shipping Urgency";
    pub const DAYS_TO_SHIP: &str = "Days to Ship";
}

/// Declared schema of the sales export. Column order in the file is free;
/// the header row resolves positions. Extra columns are ignored.
pub const SCHEMA: [(&str, ColumnType); 16] = [
    (col::ORDER_ID, ColumnType::Str),
    (col::ORDER_DATE, ColumnType::Date),
    (col::SHIP_DATE, ColumnType::Date),
    (col::REGION, ColumnType::Str),
    (col::SEGMENT, ColumnType::Str),
    (col::CATEGORY, ColumnType::Str),
    (col::SUB_CATEGORY, ColumnType::Str),
    (col::PRODUCT_NAME, ColumnType::Str),
    (col::SALES_PRICE, ColumnType::F64),
    (col::ORIGINAL_PRICE, ColumnType::F64),
    (col::PROFIT, ColumnType::F64),
    (col::QUANTITY, ColumnType::I64),
    (col::DISCOUNT, ColumnType::F64),
    (col::SHIP_MODE, ColumnType::Str),
    (col::SHIPPING_URGENCY, ColumnType::Str),
    (col::DAYS_TO_SHIP, ColumnType::I64),
];

/// Dimensions the dashboards filter on.
pub const FILTER_DIMENSIONS: [&str; 4] =
    [col::REGION, col::SEGMENT, col::CATEGORY, col::SUB_CATEGORY];

/// Accepted order/ship date formats; the first match wins.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d", "%m-%d-%Y"];

fn parse_date(field: &[u8]) -> Option<NaiveDate> {
    let s = std::str::from_utf8(field).ok()?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// One fully materialized sales transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub order_id: String,
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub region: String,
    pub segment: String,
    pub category: String,
    pub sub_category: String,
    pub product_name: String,
    pub sales_price: f64,
    pub original_price: f64,
    pub profit: f64,
    pub quantity: i64,
    pub discount: f64,
    pub ship_mode: String,
    pub shipping_urgency: String,
    pub days_to_ship: i64,
}

/// Immutable columnar view of one sales CSV export.
///
/// Loaded once per source file, never mutated afterwards. String cells
/// stay in the memory-mapped file and are addressed by offset pairs.
#[derive(Debug)]
pub struct SalesDataset {
    mmap: Option<Mmap>, // owns the CSV bytes
    columns: Vec<Column>, // one per SCHEMA entry, in schema order
    row_count: usize,
}

struct BatchResult {
    f64_batches: Vec<Vec<f64>>,
    i64_batches: Vec<Vec<i64>>,
    str_batches: Vec<Vec<(usize, usize)>>,
    date_batches: Vec<Vec<Option<NaiveDate>>>,
    row_count: usize,
    errors: Vec<RowError>,
}

impl SalesDataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        SalesDataset {
            mmap: None,
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Loads a sales CSV into memory using memory mapping.
    ///
    /// Every column named in [`SCHEMA`] must be present in the header row;
    /// a missing column fails the whole load. Cell-level problems do not:
    /// unparsable numbers coerce to zero, unparsable dates become null,
    /// and both are reported through the returned [`LoadSummary`].
    pub fn load_csv(&mut self, path: &Path) -> Result<LoadSummary, AnalyticsError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let buf: &[u8] = &mmap[..];

        // Parse header
        let bom = if buf.starts_with(&[0xEF, 0xBB, 0xBF]) { 3 } else { 0 };
        let header_end = memchr(b'\n', buf)
            .ok_or_else(|| AnalyticsError::Parse("missing header line".into()))?;
        let header_line = trim_cr(&buf[bom..header_end]);
        let mut header_fields = Vec::new();
        split_fields(header_line, &mut header_fields);
        let headers: Vec<String> = header_fields
            .iter()
            .map(|f| String::from_utf8_lossy(f).trim().to_string())
            .collect();

        // Resolve schema positions against the header
        let mut field_map = Vec::with_capacity(SCHEMA.len());
        for (name, _) in SCHEMA {
            let pos = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AnalyticsError::MissingColumn(name.to_string()))?;
            field_map.push(pos);
        }
        let file_field_count = headers.len();

        let data_start = header_end + 1;
        let data = if data_start < buf.len() {
            &buf[data_start..]
        } else {
            &[][..]
        };

        let mut columns: Vec<Column> = SCHEMA.iter().map(|(_, kind)| Column::new(*kind)).collect();
        let mut total_rows = 0;
        let mut all_errors = Vec::new();

        if !data.is_empty() {
            // Estimate rows per chunk for preallocation
            let first_line_len = memchr(b'\n', data).unwrap_or(data.len()) + 1;
            let num_threads = rayon::current_num_threads();
            let estimated_rows = (data.len() / num_threads.max(1) / first_line_len.max(1)) + 1000;

            let chunks = chunk_ranges(data, num_threads);

            // Parse chunks in parallel, offsets stay absolute in the file
            let batch_results: Vec<BatchResult> = chunks
                .par_iter()
                .map(|(start, end)| {
                    parse_chunk(
                        &data[*start..*end],
                        data_start + start,
                        &field_map,
                        file_field_count,
                        estimated_rows,
                    )
                })
                .collect();

            for mut batch in batch_results {
                total_rows += batch.row_count;
                all_errors.append(&mut batch.errors);

                for (idx, column) in columns.iter_mut().enumerate() {
                    match column {
                        Column::F64(chunks) => {
                            chunks.push(std::mem::take(&mut batch.f64_batches[idx]))
                        }
                        Column::I64(chunks) => {
                            chunks.push(std::mem::take(&mut batch.i64_batches[idx]))
                        }
                        Column::Str(chunks) => {
                            chunks.push(std::mem::take(&mut batch.str_batches[idx]))
                        }
                        Column::Date(chunks) => {
                            chunks.push(std::mem::take(&mut batch.date_batches[idx]))
                        }
                    }
                }
            }
        }

        self.mmap = Some(mmap);
        self.columns = columns;
        self.row_count = total_rows;

        let null_order_dates = self.null_date_count(col::ORDER_DATE);
        let null_ship_dates = self.null_date_count(col::SHIP_DATE);

        log::debug!(
            "loaded {} rows from {} ({} cell errors, {} null order dates)",
            total_rows,
            path.display(),
            all_errors.len(),
            null_order_dates
        );

        Ok(LoadSummary {
            rows_loaded: total_rows,
            null_order_dates,
            null_ship_dates,
            errors: all_errors,
        })
    }

    fn null_date_count(&self, name: &str) -> usize {
        match self.get_col(name) {
            Ok(c) => c.iter_date().filter(|d| d.is_none()).count(),
            Err(_) => 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn get_col(&self, name: &str) -> Result<&Column, AnalyticsError> {
        let pos = SCHEMA
            .iter()
            .position(|(n, _)| *n == name)
            .ok_or_else(|| AnalyticsError::MissingColumn(name.to_string()))?;

        self.columns
            .get(pos)
            .ok_or_else(|| AnalyticsError::MissingColumn(name.to_string()))
    }

    /// Helper to slice the mmap and return bytes for a given offset pair
    pub fn slice_bytes(&self, start: usize, end: usize) -> Result<&[u8], AnalyticsError> {
        let mmap = self.mmap.as_ref().ok_or(AnalyticsError::MmapNotLoaded)?;

        if end > mmap.len() || start > end {
            return Err(AnalyticsError::Parse("invalid byte range".into()));
        }

        Ok(&mmap[start..end])
    }

    pub fn str_value(&self, start: usize, end: usize) -> Result<&str, AnalyticsError> {
        Ok(std::str::from_utf8(self.slice_bytes(start, end)?)?)
    }

    pub fn str_offsets(&self, name: &str) -> Result<Vec<(usize, usize)>, AnalyticsError> {
        let column = self.get_col(name)?;
        match column {
            Column::Str(_) => Ok(column.iter_str().collect()),
            _ => Err(AnalyticsError::ColumnType {
                column: name.to_string(),
                expected: "string",
            }),
        }
    }

    pub fn f64_values(&self, name: &str) -> Result<Vec<f64>, AnalyticsError> {
        let column = self.get_col(name)?;
        match column {
            Column::F64(_) => Ok(column.iter_f64().collect()),
            _ => Err(AnalyticsError::ColumnType {
                column: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    pub fn i64_values(&self, name: &str) -> Result<Vec<i64>, AnalyticsError> {
        let column = self.get_col(name)?;
        match column {
            Column::I64(_) => Ok(column.iter_i64().collect()),
            _ => Err(AnalyticsError::ColumnType {
                column: name.to_string(),
                expected: "integer",
            }),
        }
    }

    pub fn date_values(&self, name: &str) -> Result<Vec<Option<NaiveDate>>, AnalyticsError> {
        let column = self.get_col(name)?;
        match column {
            Column::Date(_) => Ok(column.iter_date().collect()),
            _ => Err(AnalyticsError::ColumnType {
                column: name.to_string(),
                expected: "date",
            }),
        }
    }

    /// Numeric values of a measure column, widening integers to floats.
    pub fn measure_values(&self, name: &str) -> Result<Vec<f64>, AnalyticsError> {
        let column = self.get_col(name)?;
        match column {
            Column::F64(_) => Ok(column.iter_f64().collect()),
            Column::I64(_) => Ok(column.iter_i64().map(|v| v as f64).collect()),
            _ => Err(AnalyticsError::ColumnType {
                column: name.to_string(),
                expected: "numeric",
            }),
        }
    }

    /// Row indices whose value in `column` is a member of `allowed`,
    /// in dataset order.
    pub fn filter_in_set(
        &self,
        column: &str,
        allowed: &BTreeSet<String>,
    ) -> Result<Vec<usize>, AnalyticsError> {
        let offsets = self.str_offsets(column)?;
        let mut out = Vec::new();
        for (i, &(start, end)) in offsets.iter().enumerate() {
            if allowed.contains(self.str_value(start, end)?) {
                out.push(i);
            }
        }
        Ok(out)
    }

    /// Sorted distinct values of a categorical column; the observed
    /// domain backing the dashboards' default multiselects.
    pub fn distinct_values(&self, column: &str) -> Result<BTreeSet<String>, AnalyticsError> {
        let offsets = self.str_offsets(column)?;
        let mut out = BTreeSet::new();
        for (start, end) in offsets {
            out.insert(self.str_value(start, end)?.to_string());
        }
        Ok(out)
    }

    fn str_at(&self, name: &str, idx: usize) -> Result<String, AnalyticsError> {
        let (start, end) = self
            .get_col(name)?
            .get_str_offsets(idx)
            .ok_or_else(|| AnalyticsError::ColumnType {
                column: name.to_string(),
                expected: "string",
            })?;
        Ok(self.str_value(start, end)?.to_string())
    }

    fn f64_at(&self, name: &str, idx: usize) -> Result<f64, AnalyticsError> {
        self.get_col(name)?
            .get_f64(idx)
            .ok_or_else(|| AnalyticsError::ColumnType {
                column: name.to_string(),
                expected: "numeric",
            })
    }

    fn i64_at(&self, name: &str, idx: usize) -> Result<i64, AnalyticsError> {
        self.get_col(name)?
            .get_i64(idx)
            .ok_or_else(|| AnalyticsError::ColumnType {
                column: name.to_string(),
                expected: "integer",
            })
    }

    fn date_at(&self, name: &str, idx: usize) -> Result<Option<NaiveDate>, AnalyticsError> {
        self.get_col(name)?
            .get_date(idx)
            .ok_or_else(|| AnalyticsError::ColumnType {
                column: name.to_string(),
                expected: "date",
            })
    }

    /// Materializes one row as an owned record.
    pub fn record(&self, idx: usize) -> Result<SalesRecord, AnalyticsError> {
        if idx >= self.row_count {
            return Err(AnalyticsError::Parse(format!("row {} out of range", idx)));
        }
        Ok(SalesRecord {
            order_id: self.str_at(col::ORDER_ID, idx)?,
            order_date: self.date_at(col::ORDER_DATE, idx)?,
            ship_date: self.date_at(col::SHIP_DATE, idx)?,
            region: self.str_at(col::REGION, idx)?,
            segment: self.str_at(col::SEGMENT, idx)?,
            category: self.str_at(col::CATEGORY, idx)?,
            sub_category: self.str_at(col::SUB_CATEGORY, idx)?,
            product_name: self.str_at(col::PRODUCT_NAME, idx)?,
            sales_price: self.f64_at(col::SALES_PRICE, idx)?,
            original_price: self.f64_at(col::ORIGINAL_PRICE, idx)?,
            profit: self.f64_at(col::PROFIT, idx)?,
            quantity: self.i64_at(col::QUANTITY, idx)?,
            discount: self.f64_at(col::DISCOUNT, idx)?,
            ship_mode: self.str_at(col::SHIP_MODE, idx)?,
            shipping_urgency: self.str_at(col::SHIPPING_URGENCY, idx)?,
            days_to_ship: self.i64_at(col::DAYS_TO_SHIP, idx)?,
        })
    }

    /// Exports the dataset, or the given row subset, as an Arrow chunk
    /// for the rendering side.
    pub fn to_arrow(
        &self,
        rows: Option<&[usize]>,
    ) -> Result<(Schema, Chunk<Arc<dyn Array>>), AnalyticsError> {
        if self.columns.len() != SCHEMA.len() {
            return Err(AnalyticsError::MmapNotLoaded);
        }
        let indices: Vec<usize> = match rows {
            Some(r) => r.to_vec(),
            None => (0..self.row_count).collect(),
        };

        let fields: Vec<Field> = SCHEMA
            .iter()
            .map(|(name, kind)| {
                let dtype = match kind {
                    ColumnType::F64 => DataType::Float64,
                    ColumnType::I64 => DataType::Int64,
                    ColumnType::Str => DataType::Utf8,
                    ColumnType::Date => DataType::Date32,
                };
                Field::new(*name, dtype, matches!(kind, ColumnType::Date))
            })
            .collect();

        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date");
        let mut arrays: Vec<Arc<dyn Array>> = Vec::with_capacity(SCHEMA.len());
        for (idx, _) in SCHEMA.iter().enumerate() {
            let column = &self.columns[idx];
            match column {
                Column::F64(_) => {
                    let all: Vec<f64> = column.iter_f64().collect();
                    let values: Vec<f64> = indices.iter().map(|&i| all[i]).collect();
                    arrays.push(Arc::new(Float64Array::from_vec(values)));
                }
                Column::I64(_) => {
                    let all: Vec<i64> = column.iter_i64().collect();
                    let values: Vec<i64> = indices.iter().map(|&i| all[i]).collect();
                    arrays.push(Arc::new(Int64Array::from_vec(values)));
                }
                Column::Str(_) => {
                    let all: Vec<(usize, usize)> = column.iter_str().collect();
                    let mut arr = MutableUtf8Array::<i32>::with_capacity(indices.len());
                    for &i in &indices {
                        let (start, end) = all[i];
                        arr.push(Some(self.str_value(start, end)?));
                    }
                    let array: Utf8Array<i32> = arr.into();
                    arrays.push(Arc::new(array));
                }
                Column::Date(_) => {
                    let all: Vec<Option<NaiveDate>> = column.iter_date().collect();
                    let values: Vec<Option<i32>> = indices
                        .iter()
                        .map(|&i| all[i].map(|d| (d - epoch).num_days() as i32))
                        .collect();
                    let array = PrimitiveArray::<i32>::from(values).to(DataType::Date32);
                    arrays.push(Arc::new(array));
                }
            }
        }

        Ok((Schema::from(fields), Chunk::new(arrays)))
    }
}

impl Default for SalesDataset {
    fn default() -> Self {
        Self::new()
    }
}

/// Memoizes loaded datasets per source path. There is no expiry and no
/// file-change detection; `invalidate` and `clear` are the only ways to
/// drop an entry before the process exits.
#[derive(Debug, Default)]
pub struct DatasetCache {
    datasets: RefCell<HashMap<PathBuf, Rc<SalesDataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, path: &Path) -> Result<Rc<SalesDataset>, AnalyticsError> {
        if let Some(dataset) = self.datasets.borrow().get(path) {
            return Ok(Rc::clone(dataset));
        }

        let mut dataset = SalesDataset::new();
        let summary = dataset.load_csv(path)?;
        log::info!(
            "cached dataset {}: {} rows, {} cell errors",
            path.display(),
            summary.rows_loaded,
            summary.errors.len()
        );
        let dataset = Rc::new(dataset);
        self.datasets
            .borrow_mut()
            .insert(path.to_path_buf(), Rc::clone(&dataset));
        Ok(dataset)
    }

    pub fn invalidate(&self, path: &Path) {
        self.datasets.borrow_mut().remove(path);
    }

    pub fn clear(&self) {
        self.datasets.borrow_mut().clear();
    }
}

/// Newline-aligned chunk ranges covering `data`, one per worker.
fn chunk_ranges(data: &[u8], target_chunks: usize) -> Vec<(usize, usize)> {
    if data.is_empty() {
        return Vec::new();
    }

    let chunk_size = (data.len() / target_chunks.max(1)).max(1);
    let mut ranges = Vec::with_capacity(target_chunks);
    let mut start = 0;

    while start < data.len() {
        let mut end = (start + chunk_size).min(data.len());
        while end < data.len() && data[end] != b'\n' {
            end += 1;
        }
        if end < data.len() {
            end += 1; // include the newline
        }
        ranges.push((start, end));
        start = end;
    }

    ranges
}

fn trim_cr(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}

/// Splits one CSV line into field slices. Double-quoted fields may
/// contain commas; the surrounding quotes are excluded from the slice.
fn split_fields<'a>(line: &'a [u8], out: &mut Vec<&'a [u8]>) {
    out.clear();
    let mut pos = 0;
    loop {
        if pos >= line.len() {
            out.push(&line[line.len()..]);
            break;
        }
        if line[pos] == b'"' {
            let mut end = pos + 1;
            while end < line.len()
                && !(line[end] == b'"' && (end + 1 == line.len() || line[end + 1] == b','))
            {
                end += 1;
            }
            out.push(&line[pos + 1..end.min(line.len())]);
            if end + 1 >= line.len() {
                break;
            }
            pos = end + 2;
        } else {
            match memchr(b',', &line[pos..]) {
                Some(rel) => {
                    out.push(&line[pos..pos + rel]);
                    pos += rel + 1;
                }
                None => {
                    out.push(&line[pos..]);
                    break;
                }
            }
        }
    }
}

/// Per-batch storage for every schema column of the given kind; columns
/// of other kinds stay empty so batch merging can index by schema position.
fn alloc_batches<T>(wanted: ColumnType, estimated_rows: usize) -> Vec<Vec<T>> {
    SCHEMA
        .iter()
        .map(|(_, kind)| {
            if *kind == wanted {
                Vec::with_capacity(estimated_rows)
            } else {
                Vec::new()
            }
        })
        .collect()
}

fn parse_chunk(
    chunk: &[u8],
    chunk_offset: usize, // absolute offset of this chunk in the file
    field_map: &[usize],
    file_field_count: usize,
    estimated_rows: usize,
) -> BatchResult {
    let schema_len = SCHEMA.len();

    let mut f64_cols: Vec<Vec<f64>> = alloc_batches(ColumnType::F64, estimated_rows);
    let mut i64_cols: Vec<Vec<i64>> = alloc_batches(ColumnType::I64, estimated_rows);
    let mut str_cols: Vec<Vec<(usize, usize)>> = alloc_batches(ColumnType::Str, estimated_rows);
    let mut date_cols: Vec<Vec<Option<NaiveDate>>> = alloc_batches(ColumnType::Date, estimated_rows);

    let mut errors = Vec::new();
    let mut row_count = 0;
    let mut fields: Vec<&[u8]> = Vec::with_capacity(file_field_count);

    let mut line_ranges: Vec<(usize, usize)> = Vec::new();
    let mut line_start = 0;
    for newline_pos in memchr_iter(b'\n', chunk) {
        line_ranges.push((line_start, newline_pos));
        line_start = newline_pos + 1;
    }
    // A final line without a trailing newline still counts
    if line_start < chunk.len() {
        line_ranges.push((line_start, chunk.len()));
    }

    for (start, end) in line_ranges {
        let line = trim_cr(&chunk[start..end]);
        if line.is_empty() {
            continue;
        }
        let line_offset = chunk_offset + start;

        split_fields(line, &mut fields);

        if fields.len() != file_field_count {
            errors.push(RowError {
                offset: line_offset,
                column: String::new(),
                value: String::from_utf8_lossy(line).into_owned(),
                reason: format!("expected {} fields, got {}", file_field_count, fields.len()),
            });
            continue;
        }

        for (schema_idx, (name, kind)) in SCHEMA.iter().enumerate() {
            let field = fields[field_map[schema_idx]];
            match kind {
                ColumnType::F64 => match fast_float::parse::<f64, _>(field) {
                    Ok(value) => f64_cols[schema_idx].push(value),
                    Err(e) => {
                        // Coerce to zero so the columns never skew
                        f64_cols[schema_idx].push(0.0);
                        errors.push(RowError {
                            offset: line_offset,
                            column: name.to_string(),
                            value: String::from_utf8_lossy(field).into_owned(),
                            reason: e.to_string(),
                        });
                    }
                },
                ColumnType::I64 => match atoi_simd::parse::<i64>(field) {
                    Ok(value) => i64_cols[schema_idx].push(value),
                    Err(e) => {
                        i64_cols[schema_idx].push(0);
                        errors.push(RowError {
                            offset: line_offset,
                            column: name.to_string(),
                            value: String::from_utf8_lossy(field).into_owned(),
                            reason: e.to_string(),
                        });
                    }
                },
                ColumnType::Str => {
                    // Absolute offsets into the mmap
                    let field_start =
                        chunk_offset + (field.as_ptr() as usize - chunk.as_ptr() as usize);
                    str_cols[schema_idx].push((field_start, field_start + field.len()));
                }
                ColumnType::Date => {
                    date_cols[schema_idx].push(parse_date(field));
                }
            }
        }

        row_count += 1;
    }

    debug_assert_eq!(f64_cols.len(), schema_len);

    BatchResult {
        f64_batches: f64_cols,
        i64_batches: i64_cols,
        str_batches: str_cols,
        date_batches: date_cols,
        row_count,
        errors,
    }
}
