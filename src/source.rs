//! # Tabular Sources
//!
//! The producer side of serialization: anything that can hand over one or
//! more result sets, each as column metadata plus a forward-only run of
//! rows, consumed exactly once. A live query cursor satisfies this shape
//! directly; [`MemoryTableSource`] adapts already-materialized tables.
//!
//! Sources are consumed by [`serialize`](crate::writer::serialize) in a
//! single pass and are never rewound.

use crate::error::{Error, Result};
use crate::row::RowBuffer;
use crate::schema::{ColumnDef, SourceColumn};
use crate::types::Value;
use std::collections::VecDeque;

/// A forward-only sequence of result sets.
///
/// `columns` describes the current result set and must be stable until
/// `try_advance_result_set` succeeds. `try_read_next_row` yields rows in
/// order until the current result set is exhausted.
pub trait TabularSource {
    /// Column metadata of the current result set, in order.
    fn columns(&self) -> &[SourceColumn];

    /// Next row of the current result set, or `None` when exhausted.
    /// Row length must equal the column count; `Value::Null` marks nulls.
    fn try_read_next_row(&mut self) -> Result<Option<RowBuffer>>;

    /// Moves to the next result set. Returns false when there is none.
    fn try_advance_result_set(&mut self) -> Result<bool>;
}

/// One materialized table: typed columns plus owned rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    columns: Vec<SourceColumn>,
    rows: VecDeque<RowBuffer>,
}

impl MemoryTable {
    /// A table whose source metadata reports each column's canonical
    /// catalog type name.
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|c| SourceColumn::new(c.name, c.data_type.name()))
                .collect(),
            rows: VecDeque::new(),
        }
    }

    /// A table with raw source metadata, for exercising name resolution
    /// and override paths.
    pub fn with_source_columns(columns: Vec<SourceColumn>) -> Self {
        Self {
            columns,
            rows: VecDeque::new(),
        }
    }

    /// Appends a row. The row must have one value per column.
    pub fn push_row(&mut self, row: impl IntoIterator<Item = Value<'static>>) -> Result<()> {
        let row: RowBuffer = row.into_iter().collect();
        if row.len() != self.columns.len() {
            return Err(Error::InvalidOperation(format!(
                "row has {} values for {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push_back(row);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Adapts a sequence of in-memory tables into a [`TabularSource`].
///
/// Always presents at least one result set: an empty source behaves like a
/// single table with zero columns and zero rows, matching the writer's
/// guarantee that a stream contains at least one table block.
#[derive(Debug)]
pub struct MemoryTableSource {
    current: MemoryTable,
    remaining: VecDeque<MemoryTable>,
}

impl MemoryTableSource {
    pub fn new(tables: impl IntoIterator<Item = MemoryTable>) -> Self {
        let mut remaining: VecDeque<MemoryTable> = tables.into_iter().collect();
        let current = remaining.pop_front().unwrap_or_default();
        Self { current, remaining }
    }
}

impl From<MemoryTable> for MemoryTableSource {
    fn from(table: MemoryTable) -> Self {
        Self::new([table])
    }
}

impl TabularSource for MemoryTableSource {
    fn columns(&self) -> &[SourceColumn] {
        &self.current.columns
    }

    fn try_read_next_row(&mut self) -> Result<Option<RowBuffer>> {
        Ok(self.current.rows.pop_front())
    }

    fn try_advance_result_set(&mut self) -> Result<bool> {
        match self.remaining.pop_front() {
            Some(next) => {
                self.current = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
