//! # logtable - Numeric Tables from Simulation Logs
//!
//! `logtable` pulls the repeated numeric blocks out of loosely structured
//! log text (LAMMPS thermo output, solver residual tables, benchmark
//! printouts) where they sit between banners, warnings and prose. One block
//! is chosen by position, optionally extended with derived columns, and
//! exported for plotting.
//!
//! ## Quick Start
//!
//! ```rust
//! use logtable::expr::{apply_operations, NamespacePolicy};
//! use logtable::segment::{scan_str, ColumnSpec, HeaderPolicy, InstanceSelector};
//!
//! let log = "\
//! Setting up Verlet run ...
//! Step Temp PotEng TotEng
//!        0    1.44   -6.77   -4.62
//!       50    0.70   -5.67   -4.62
//! Loop time of 0.04 on 1 procs
//! ";
//!
//! let columns = ColumnSpec::new(["Step", "PotEng", "TotEng"])?;
//! let segments = scan_str(log, &columns, HeaderPolicy::default())?;
//! assert_eq!(segments.len(), 1);
//!
//! let selector: InstanceSelector = "last".parse()?;
//! let mut table = segments.select_table(&selector)?;
//!
//! let report = apply_operations(&mut table, &["KinEng = TotEng - PotEng"], NamespacePolicy::default());
//! assert!(!report.has_failures());
//! assert_eq!(table.column_names(), &["Step", "PotEng", "TotEng", "KinEng"]);
//! # Ok::<(), logtable::segment::SegmentError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`segment`]: tokenizer, header detection, the segment state machine,
//!   and instance selection
//! - [`expr`]: expression parser and vector evaluator for derived columns
//! - [`table`]: ordered named-column tables and CSV / JSON / Parquet export
//!
//! ## Scan Rules
//!
//! A line is a header when it contains every requested column name. The
//! rows that follow are collected while their token count equals the
//! header's and every token is numeric; the first other line ends the
//! table. Malformed content never fails a scan.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod expr;
pub mod segment;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::expr::{
        apply_operations, BatchReport, ExprError, NamespacePolicy, Operation, OperationError,
        OperationOutcome,
    };
    pub use crate::segment::{
        scan_file, scan_reader, scan_str, ColumnSpec, HeaderPolicy, InstanceSelector, Segment,
        SegmentError, SegmentSet,
    };
    pub use crate::table::{
        export_file, CompressionType, ExportConfig, ExportFormat, ExportMetadata, PlotMetadata,
        Table, TableError,
    };
}
