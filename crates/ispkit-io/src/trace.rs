//! CDF trace dumps
//!
//! The hardware keeps one 256-entry CDF table per tile in block RAM. A
//! trace lists those tables the way a memory dump does: tiles in
//! row-major order, 256 entries per tile, one unpadded lowercase hex
//! value per line. Comparing a software trace with the RTL dump isolates
//! mismatches to the histogram stage before any pixel is interpolated.

use crate::hex::{check_count, for_each_entry, is_hex, parse_error};
use crate::IoResult;
use ispkit_core::LEVELS;
use std::io::{BufRead, Write};

/// One tile's table
pub type CdfTable = [u32; LEVELS];

/// Write per-tile tables, tiles in the given order.
pub fn write_cdf_trace<W: Write>(tables: &[CdfTable], mut writer: W) -> IoResult<()> {
    for table in tables {
        for v in table {
            writeln!(writer, "{:x}", v)?;
        }
    }
    writer.flush()?;
    log::debug!("wrote CDF trace of {} tiles", tables.len());
    Ok(())
}

/// Read `tiles` tables from a trace.
///
/// # Errors
///
/// Returns [`crate::IoError::HexParse`] for a malformed line and
/// [`crate::IoError::EntryCount`] if the trace does not hold exactly
/// `tiles * 256` entries.
pub fn read_cdf_trace<R: BufRead>(reader: R, tiles: usize) -> IoResult<Vec<CdfTable>> {
    let mut values = Vec::with_capacity(tiles * LEVELS);
    for_each_entry(reader, |line, text| {
        if text.len() > 8 || !is_hex(text) {
            return Err(parse_error(line, text));
        }
        let v = u32::from_str_radix(text, 16).map_err(|_| parse_error(line, text))?;
        values.push(v);
        Ok(())
    })?;
    check_count(tiles * LEVELS, values.len())?;

    let tables = values
        .chunks_exact(LEVELS)
        .map(|chunk| {
            let mut table = [0u32; LEVELS];
            table.copy_from_slice(chunk);
            table
        })
        .collect();
    Ok(tables)
}

/// First (tile, level) at which two traces differ.
pub fn first_trace_mismatch(a: &[CdfTable], b: &[CdfTable]) -> Option<(usize, usize)> {
    for (tile, (ta, tb)) in a.iter().zip(b).enumerate() {
        if let Some(level) = ta.iter().zip(tb.iter()).position(|(x, y)| x != y) {
            return Some((tile, level));
        }
    }
    if a.len() != b.len() {
        return Some((a.len().min(b.len()), 0));
    }
    None
}
