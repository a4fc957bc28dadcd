// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON and CSV export of an [`AggregateStore`].

use std::io::Write;

use tracing::debug;

use crate::store::AggregateStore;
use crate::Result;

/// Write the whole store as one JSON object `{field: [values...]}`.
///
/// NaN (an absent bottom track) is written as `null`.
pub fn to_json_writer<W: Write>(store: &AggregateStore, writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, store)?;
    } else {
        serde_json::to_writer(writer, store)?;
    }
    debug!(rows = store.len(), "wrote JSON export");
    Ok(())
}

/// Write the scalar columns as CSV, one row per ensemble.
///
/// Per-cell sequences, the offset table and the real-time clock tuple are
/// left out. NaN is written as an empty cell.
pub fn to_csv_writer<W: Write>(store: &AggregateStore, mut writer: W) -> Result<()> {
    let columns: Vec<_> = store
        .columns()
        .into_iter()
        .filter(|(_, column)| column.is_scalar())
        .collect();

    let header: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    writeln!(writer, "{}", header.join(","))?;

    for row in 0..store.len() {
        let cells: Vec<String> = columns
            .iter()
            .map(|(_, column)| column.format_cell(row))
            .collect();
        writeln!(writer, "{}", cells.join(","))?;
    }
    writer.flush()?;
    debug!(rows = store.len(), columns = columns.len(), "wrote CSV export");
    Ok(())
}
