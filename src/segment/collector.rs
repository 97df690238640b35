//! Two-state machine that turns an ordered stream of log lines into segments.
//!
//! The collector is either `Scanning` (outside any table) or `Collecting`
//! (inside a table opened by a header line). Every line is classified in
//! file order:
//!
//! 1. A header line for the requested columns opens a fresh, empty buffer.
//!    What happens to a buffer that is still open is governed by
//!    [`HeaderPolicy`].
//! 2. While collecting, a line whose token count equals the header width and
//!    whose tokens are all numeric is appended. Anything else closes the
//!    segment; a non-empty buffer is emitted.
//! 3. While scanning, non-header lines are ignored.
//!
//! Empty buffers are never emitted.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::header::{detect_header, ColumnSpec, HeaderMap};
use super::store::{Segment, SegmentSet};
use super::tokenizer::{all_numeric, tokenize};

/// What to do with rows still buffered when a new header line appears.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Drop the open buffer and start over under the new header.
    ///
    /// A table that is immediately followed by another header is lost.
    #[default]
    Discard,

    /// Emit the open buffer as a segment, then start over.
    Flush,
}

impl HeaderPolicy {
    /// Returns all available policy names.
    pub fn variants() -> &'static [&'static str] {
        &["discard", "flush"]
    }
}

impl fmt::Display for HeaderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderPolicy::Discard => write!(f, "discard"),
            HeaderPolicy::Flush => write!(f, "flush"),
        }
    }
}

impl FromStr for HeaderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discard" => Ok(HeaderPolicy::Discard),
            "flush" => Ok(HeaderPolicy::Flush),
            _ => Err(format!(
                "Unknown header policy '{}'. Valid options: {}",
                s,
                HeaderPolicy::variants().join(", ")
            )),
        }
    }
}

/// Collector state between lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectorState {
    /// Outside any table
    Scanning,
    /// Accumulating rows under a recognized header
    Collecting,
}

/// The transition taken for a single line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// A header line opened a new, empty buffer.
    ///
    /// `discard_buffer` is true under [`HeaderPolicy::Discard`]; `dropped_rows`
    /// counts the rows lost that way (always 0 under `Flush`, which emits
    /// them instead).
    NewHeader {
        /// Whether an open buffer is discarded rather than flushed
        discard_buffer: bool,
        /// Rows thrown away by this transition
        dropped_rows: usize,
    },
    /// A data row was appended to the open buffer
    RowAccepted,
    /// A width or numeric mismatch closed the open segment
    Closed {
        /// Whether a non-empty buffer was emitted as a segment
        emitted: bool,
    },
    /// Non-header line while scanning
    Ignored,
}

/// Buffer for the segment currently being collected
#[derive(Debug)]
struct OpenSegment {
    header: HeaderMap,
    header_line: usize,
    first_line: usize,
    last_line: usize,
    rows: Vec<Vec<f64>>,
}

impl OpenSegment {
    fn new(header: HeaderMap, header_line: usize) -> Self {
        Self {
            header,
            header_line,
            first_line: 0,
            last_line: 0,
            rows: Vec::new(),
        }
    }

    fn into_segment(self) -> Option<Segment> {
        if self.rows.is_empty() {
            return None;
        }
        Some(Segment::new(
            self.header_line,
            self.first_line,
            self.last_line,
            self.header.width(),
            self.rows,
        ))
    }
}

/// Line-driven segment state machine.
#[derive(Debug)]
pub struct SegmentCollector {
    columns: ColumnSpec,
    policy: HeaderPolicy,
    open: Option<OpenSegment>,
    segments: Vec<Segment>,
    lines_seen: usize,
}

impl SegmentCollector {
    /// Create a collector for the given columns and header policy
    pub fn new(columns: ColumnSpec, policy: HeaderPolicy) -> Self {
        Self {
            columns,
            policy,
            open: None,
            segments: Vec::new(),
            lines_seen: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> CollectorState {
        if self.open.is_some() {
            CollectorState::Collecting
        } else {
            CollectorState::Scanning
        }
    }

    /// Number of segments emitted so far
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Feed the next line of the log. Line numbers are 1-based and counted
    /// internally, so lines must arrive in file order.
    pub fn push_line(&mut self, line: &str) -> Transition {
        self.lines_seen += 1;
        let line_no = self.lines_seen;
        let tokens = tokenize(line);

        if let Some(header) = detect_header(&tokens, &self.columns) {
            return self.open_segment(header, line_no);
        }

        let Some(open) = self.open.as_mut() else {
            return Transition::Ignored;
        };

        if tokens.len() == open.header.width() && all_numeric(&tokens) {
            if let Some(row) = open.header.project(&tokens) {
                if open.rows.is_empty() {
                    open.first_line = line_no;
                }
                open.last_line = line_no;
                open.rows.push(row);
                return Transition::RowAccepted;
            }
        }

        let emitted = self.close_segment();
        Transition::Closed { emitted }
    }

    /// Flush any open buffer and return the completed segment set
    pub fn finish(mut self) -> SegmentSet {
        self.close_segment();
        debug!(
            "Scan finished after {} lines: {} segment(s)",
            self.lines_seen,
            self.segments.len()
        );
        SegmentSet::new(self.columns, self.segments)
    }

    fn open_segment(&mut self, header: HeaderMap, line_no: usize) -> Transition {
        let discard_buffer = self.policy == HeaderPolicy::Discard;
        let mut dropped_rows = 0;

        if let Some(previous) = self.open.take() {
            if discard_buffer {
                dropped_rows = previous.rows.len();
                if dropped_rows > 0 {
                    debug!(
                        "Header at line {} discards {} buffered row(s) opened at line {}",
                        line_no, dropped_rows, previous.header_line
                    );
                }
            } else {
                self.emit(previous);
            }
        }

        debug!(
            "Header at line {} (width {}) opens a segment",
            line_no,
            header.width()
        );
        self.open = Some(OpenSegment::new(header, line_no));

        Transition::NewHeader {
            discard_buffer,
            dropped_rows,
        }
    }

    fn close_segment(&mut self) -> bool {
        match self.open.take() {
            Some(open) => self.emit(open),
            None => false,
        }
    }

    fn emit(&mut self, open: OpenSegment) -> bool {
        match open.into_segment() {
            Some(segment) => {
                debug!(
                    "Segment {} emitted: lines {}-{}, {} row(s)",
                    self.segments.len() + 1,
                    segment.first_line(),
                    segment.last_line(),
                    segment.row_count()
                );
                self.segments.push(segment);
                true
            }
            None => false,
        }
    }
}
