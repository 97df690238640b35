//! # Segment Extraction
//!
//! Finds the repeated numeric tables embedded in loosely structured log
//! text, such as the thermodynamic output blocks of a LAMMPS run mixed with
//! banners, warnings and timing prose.
//!
//! ## Pipeline
//!
//! 1. **Tokenizer**: each line becomes its whitespace-delimited tokens.
//! 2. **Header detection**: a line is a header when every requested column
//!    name occurs among its tokens.
//! 3. **Collection**: rows whose width equals the header width and whose
//!    tokens are all numeric are buffered; the first mismatch closes the
//!    segment.
//! 4. **Selection**: `first`, `last` or a 1-based number picks one segment,
//!    which is materialized as a [`Table`](crate::table::Table).
//!
//! Malformed log content never fails a scan. It only ever ends a segment.

mod collector;
mod error;
mod header;
mod scan;
mod selector;
mod store;
pub mod tokenizer;

#[cfg(test)]
mod tests;

pub use collector::{CollectorState, HeaderPolicy, SegmentCollector, Transition};
pub use error::SegmentError;
pub use header::{detect_header, ColumnSpec, HeaderMap};
pub use scan::{scan_file, scan_reader, scan_str};
pub use selector::InstanceSelector;
pub use store::{Segment, SegmentSet};
