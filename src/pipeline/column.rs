use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    F64,
    I64,
    Str,
    Date,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::F64 => "numeric",
            ColumnType::I64 => "integer",
            ColumnType::Str => "string",
            ColumnType::Date => "date",
        }
    }
}

/// Columnar storage, one entry per schema column. String cells are
/// absolute byte offsets into the memory-mapped source file; date cells
/// are null when the source text did not parse.
///
/// Each column holds one chunk per parse batch, merged in file order.
#[derive(Debug, Clone)]
pub enum Column {
    F64(Vec<Vec<f64>>),
    I64(Vec<Vec<i64>>),
    Str(Vec<Vec<(usize, usize)>>),
    Date(Vec<Vec<Option<NaiveDate>>>),
}

impl Column {
    pub fn new(kind: ColumnType) -> Self {
        match kind {
            ColumnType::F64 => Column::F64(Vec::new()),
            ColumnType::I64 => Column::I64(Vec::new()),
            ColumnType::Str => Column::Str(Vec::new()),
            ColumnType::Date => Column::Date(Vec::new()),
        }
    }

    pub fn kind(&self) -> ColumnType {
        match self {
            Column::F64(_) => ColumnType::F64,
            Column::I64(_) => ColumnType::I64,
            Column::Str(_) => ColumnType::Str,
            Column::Date(_) => ColumnType::Date,
        }
    }

    // Efficient iteration
    pub fn iter_f64(&self) -> impl Iterator<Item = f64> + '_ {
        match self {
            Column::F64(chunks) => chunks.iter().flat_map(|chunk| chunk.iter().copied()),
            _ => panic!("wrong column kind"),
        }
    }

    pub fn iter_i64(&self) -> impl Iterator<Item = i64> + '_ {
        match self {
            Column::I64(chunks) => chunks.iter().flat_map(|chunk| chunk.iter().copied()),
            _ => panic!("wrong column kind"),
        }
    }

    pub fn iter_str(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        match self {
            Column::Str(chunks) => chunks.iter().flat_map(|chunk| chunk.iter().copied()),
            _ => panic!("wrong column kind"),
        }
    }

    pub fn iter_date(&self) -> impl Iterator<Item = Option<NaiveDate>> + '_ {
        match self {
            Column::Date(chunks) => chunks.iter().flat_map(|chunk| chunk.iter().copied()),
            _ => panic!("wrong column kind"),
        }
    }

    // Random access, walking the chunk list
    pub fn get_f64(&self, idx: usize) -> Option<f64> {
        match self {
            Column::F64(chunks) => chunk_get(chunks, idx).copied(),
            _ => None,
        }
    }

    pub fn get_i64(&self, idx: usize) -> Option<i64> {
        match self {
            Column::I64(chunks) => chunk_get(chunks, idx).copied(),
            _ => None,
        }
    }

    pub fn get_str_offsets(&self, idx: usize) -> Option<(usize, usize)> {
        match self {
            Column::Str(chunks) => chunk_get(chunks, idx).copied(),
            _ => None,
        }
    }

    pub fn get_date(&self, idx: usize) -> Option<Option<NaiveDate>> {
        match self {
            Column::Date(chunks) => chunk_get(chunks, idx).copied(),
            _ => None,
        }
    }

    pub fn total_len(&self) -> usize {
        match self {
            Column::F64(chunks) => chunks.iter().map(|c| c.len()).sum(),
            Column::I64(chunks) => chunks.iter().map(|c| c.len()).sum(),
            Column::Str(chunks) => chunks.iter().map(|c| c.len()).sum(),
            Column::Date(chunks) => chunks.iter().map(|c| c.len()).sum(),
        }
    }
}

fn chunk_get<T>(chunks: &[Vec<T>], idx: usize) -> Option<&T> {
    let mut remaining = idx;
    for chunk in chunks {
        if remaining < chunk.len() {
            return Some(&chunk[remaining]);
        }
        remaining -= chunk.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_spans_chunks() {
        let col = Column::F64(vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(col.iter_f64().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert_eq!(col.total_len(), 3);
    }

    #[test]
    fn random_access_spans_chunks() {
        let col = Column::I64(vec![vec![10, 20], vec![30]]);
        assert_eq!(col.get_i64(2), Some(30));
        assert_eq!(col.get_i64(3), None);
    }

    #[test]
    fn date_cells_keep_nulls() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15);
        let col = Column::Date(vec![vec![d, None]]);
        assert_eq!(col.get_date(1), Some(None));
        assert_eq!(col.iter_date().flatten().count(), 1);
    }
}
