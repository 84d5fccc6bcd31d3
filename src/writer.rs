//! # Streaming Writer
//!
//! Drives a [`TabularSource`] into a byte sink in one forward pass. Per
//! result set: open a table group, build the schema from the source's
//! metadata under the caller's options, write the header, then pull and
//! write rows one at a time until the source runs dry; close the group and
//! move to the next result set.
//!
//! At most one row is buffered at any instant, plus one schema's worth of
//! column descriptors, so result sets of any length stream through in
//! constant memory.
//!
//! The source is consumed: a partially-read result set is drained from its
//! current position, and nothing is ever rewound. Any failure propagates
//! immediately and leaves the sink unspecified; there is no partial-write
//! recovery. On success the sink is flushed before returning.

use crate::encoding::WireWriter;
use crate::error::Result;
use crate::header::{self, TABLE_GROUP};
use crate::row;
use crate::schema::{Schema, WriterOptions};
use crate::source::TabularSource;
use std::io::Write;

/// Serializes every remaining result set of `source` into `sink`.
///
/// The stream always contains at least one table block: a source that is
/// already empty still writes its (possibly zero-column) schema.
pub fn serialize<S, W>(source: &mut S, sink: W, options: &WriterOptions) -> Result<()>
where
    S: TabularSource,
    W: Write,
{
    let mut writer = WireWriter::new(sink);
    loop {
        writer.start_group(TABLE_GROUP)?;
        let schema = Schema::from_source(source.columns(), options)?;
        header::write_header(&mut writer, &schema)?;
        while let Some(row) = source.try_read_next_row()? {
            row::write_row(&mut writer, &schema, &row)?;
        }
        writer.end_group(TABLE_GROUP)?;
        if !source.try_advance_result_set()? {
            break;
        }
    }
    writer.flush()
}
