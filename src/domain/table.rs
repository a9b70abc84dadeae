// Assembled report table - Column titles plus a row-major cell matrix
use super::cell::ColumnValue;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    titles: Vec<String>,
    rows: Vec<Vec<ColumnValue>>,
}

/// Where cells without a value end up after sorting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NullsPlacement {
    #[default]
    First,
    Last,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub descending: bool,
    pub nulls: NullsPlacement,
}

impl SortSpec {
    pub fn ascending() -> Self {
        Self::default()
    }

    pub fn descending() -> Self {
        Self {
            descending: true,
            ..Self::default()
        }
    }

    pub fn with_nulls(mut self, nulls: NullsPlacement) -> Self {
        self.nulls = nulls;
        self
    }
}

/// Comparable view of one cell. Numbers order before text.
#[derive(Debug)]
enum SortValue<'a> {
    Null,
    Number(f64),
    Text(&'a str),
}

impl<'a> SortValue<'a> {
    fn of(cell: Option<&'a ColumnValue>) -> Self {
        match cell {
            Some(cell) => match cell.sort_key() {
                Some(key) if !key.is_nan() => SortValue::Number(key),
                _ if cell.is_blank() => SortValue::Null,
                _ => SortValue::Text(cell.value()),
            },
            None => SortValue::Null,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

impl Table {
    pub fn new(titles: Vec<String>, rows: Vec<Vec<ColumnValue>>) -> Self {
        Self { titles, rows }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn rows(&self) -> &[Vec<ColumnValue>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&ColumnValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.titles.len()
    }

    pub fn into_rows(self) -> Vec<Vec<ColumnValue>> {
        self.rows
    }

    /// Stable sort of the rows by one column. Equal keys keep their original
    /// relative order; nulls go where `sort.nulls` says in both directions.
    pub fn sort_by_column(&mut self, column: usize, sort: SortSpec) {
        if column >= self.column_count() {
            tracing::warn!(
                "Sort column {} out of range ({} columns), leaving rows unsorted",
                column,
                self.column_count()
            );
            return;
        }
        self.rows.sort_by(|a, b| {
            let (a, b) = (SortValue::of(a.get(column)), SortValue::of(b.get(column)));
            match (&a, &b) {
                (SortValue::Null, SortValue::Null) => Ordering::Equal,
                (SortValue::Null, _) => match sort.nulls {
                    NullsPlacement::First => Ordering::Less,
                    NullsPlacement::Last => Ordering::Greater,
                },
                (_, SortValue::Null) => match sort.nulls {
                    NullsPlacement::First => Ordering::Greater,
                    NullsPlacement::Last => Ordering::Less,
                },
                _ if sort.descending => b.compare(&a),
                _ => a.compare(&b),
            }
        });
    }
}
