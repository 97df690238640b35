use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use super::collector::{HeaderPolicy, SegmentCollector};
use super::header::ColumnSpec;
use super::store::SegmentSet;
use super::SegmentError;

/// Scan a log file to completion and return every segment found
pub fn scan_file<P: AsRef<Path>>(
    path: P,
    columns: &ColumnSpec,
    policy: HeaderPolicy,
) -> Result<SegmentSet, SegmentError> {
    let file = File::open(path)?;
    scan_reader(BufReader::new(file), columns, policy)
}

/// Scan log text held in memory
pub fn scan_str(
    text: &str,
    columns: &ColumnSpec,
    policy: HeaderPolicy,
) -> Result<SegmentSet, SegmentError> {
    scan_reader(text.as_bytes(), columns, policy)
}

/// Scan any buffered reader line by line.
///
/// Invalid UTF-8 is replaced rather than rejected: such lines can only ever
/// end a segment, never abort the scan. Only I/O failures are errors.
pub fn scan_reader<R: BufRead>(
    mut reader: R,
    columns: &ColumnSpec,
    policy: HeaderPolicy,
) -> Result<SegmentSet, SegmentError> {
    let mut collector = SegmentCollector::new(columns.clone(), policy);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        collector.push_line(&String::from_utf8_lossy(&buf));
    }

    let set = collector.finish();
    info!("Total data segments found: {}", set.len());
    Ok(set)
}
