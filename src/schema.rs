//! # Schema Construction
//!
//! An ordered list of `(name, logical type)` pairs built once per result
//! set, before any row is encoded or decoded. Column position is the only
//! row-indexing key; names need not be unique.
//!
//! Construction policy, per column:
//!
//! 1. An explicit override in [`WriterOptions`] always wins.
//! 2. Otherwise the source-reported type name is resolved through the
//!    catalog ([`LogicalType::from_name`]).
//! 3. No catalog entry and no override fails with
//!    [`Error::UnmappableColumn`], before a single row is touched.
//!
//! A `Schema` is immutable after construction; the decode side rebuilds it
//! from the table header instead of mutating an existing one.

use crate::error::{Error, Result};
use crate::types::LogicalType;
use hashbrown::HashMap;

/// One column: display name plus catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: LogicalType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Column metadata as reported by a tabular source: a name and a
/// provider-level type name, prior to catalog resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumn {
    pub name: String,
    pub type_name: String,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Serialization options consumed by the writer.
///
/// Currently a single knob: per-column logical-type overrides, keyed by
/// column name. Overrides bypass catalog name resolution entirely.
#[derive(Debug, Clone, Default)]
pub struct WriterOptions {
    type_overrides: HashMap<String, LogicalType>,
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the named column to encode as `data_type`, regardless of the
    /// type the source reports for it.
    pub fn override_column(mut self, name: impl Into<String>, data_type: LogicalType) -> Self {
        self.type_overrides.insert(name.into(), data_type);
        self
    }

    pub fn type_override(&self, name: &str) -> Option<LogicalType> {
        self.type_overrides.get(name).copied()
    }
}

/// Ordered, immutable column list for one result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Builds a schema from source-reported metadata under the given
    /// options. Fails on the first column whose type cannot be resolved.
    pub fn from_source(columns: &[SourceColumn], options: &WriterOptions) -> Result<Schema> {
        let mut defs = Vec::with_capacity(columns.len());
        for col in columns {
            let data_type = match options.type_override(&col.name) {
                Some(ty) => ty,
                None => LogicalType::from_name(&col.type_name).ok_or_else(|| {
                    Error::UnmappableColumn {
                        column: col.name.clone(),
                        type_name: col.type_name.clone(),
                    }
                })?,
            };
            defs.push(ColumnDef::new(col.name.clone(), data_type));
        }
        Ok(Schema::new(defs))
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, idx: usize) -> Option<&ColumnDef> {
        self.columns.get(idx)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDef> {
        self.columns.iter()
    }
}
