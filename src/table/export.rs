//! Table export to CSV, JSON and Parquet.
//!
//! Parquet output stores each column as a non-nullable `Float64` field and
//! carries [`ExportMetadata`] in the file footer, so a plotting front end
//! can recover the x axis, series and labels without extra files.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use log::info;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;
use serde::Serialize;

use super::{ExportMetadata, Table, TableError};

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Pretty-printed JSON with ordered columns
    Json,
    /// Apache Parquet with footer metadata
    Parquet,
}

impl ExportFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        ext.parse()
    }
}

impl FromStr for ExportFormat {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "parquet" | "pq" => Ok(ExportFormat::Parquet),
            _ => Err(TableError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Parquet => write!(f, "parquet"),
        }
    }
}

/// Compression options for Parquet output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// ZSTD compression at the given level
    Zstd(i32),
    /// Snappy compression
    Snappy,
    /// No compression
    Uncompressed,
}

impl Default for CompressionType {
    fn default() -> Self {
        Self::Zstd(3)
    }
}

impl CompressionType {
    fn to_parquet(self) -> Compression {
        match self {
            CompressionType::Zstd(level) => {
                Compression::ZSTD(ZstdLevel::try_new(level).unwrap_or_default())
            }
            CompressionType::Snappy => Compression::SNAPPY,
            CompressionType::Uncompressed => Compression::UNCOMPRESSED,
        }
    }
}

/// Configuration for Parquet output
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Compression codec
    pub compression: CompressionType,

    /// Maximum rows per row group
    pub row_group_size: usize,

    /// Whether to write column statistics
    pub write_statistics: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            compression: CompressionType::default(),
            row_group_size: 100_000,
            write_statistics: true,
        }
    }
}

impl ExportConfig {
    fn to_writer_properties(&self, metadata: &HashMap<String, String>) -> WriterProperties {
        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        let mut kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();
        kv_metadata.sort_by(|a, b| a.key.cmp(&b.key));

        WriterProperties::builder()
            .set_compression(self.compression.to_parquet())
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size.max(1))
            .set_key_value_metadata(Some(kv_metadata))
            .build()
    }
}

/// Convert a table into a single Arrow record batch
pub fn to_record_batch(table: &Table) -> Result<RecordBatch, TableError> {
    let fields: Vec<Field> = table
        .column_names()
        .iter()
        .map(|name| Field::new(name, DataType::Float64, false))
        .collect();

    let arrays: Vec<ArrayRef> = table
        .iter()
        .map(|(_, values)| Arc::new(Float64Array::from(values.to_vec())) as ArrayRef)
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &options,
    )?)
}

/// Write a table as Parquet with export metadata in the footer
pub fn write_parquet<W: Write + Send>(
    table: &Table,
    writer: W,
    metadata: &ExportMetadata,
    config: &ExportConfig,
) -> Result<(), TableError> {
    let batch = to_record_batch(table)?;
    let footer = metadata.to_parquet_metadata(table.independent_axis())?;
    let props = config.to_writer_properties(&footer);

    let mut writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Write a table as CSV with a header row
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.column_names())?;

    for row in 0..table.row_count() {
        let record = table.iter().map(|(_, values)| values[row].to_string());
        csv_writer.write_record(record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonColumn<'a> {
    name: &'a str,
    values: &'a [f64],
}

#[derive(Serialize)]
struct JsonTable<'a> {
    independent_axis: &'a str,
    row_count: usize,
    columns: Vec<JsonColumn<'a>>,
}

/// Write a table as pretty-printed JSON.
///
/// Non-finite values are written as `null`, since JSON has no NaN or infinity.
pub fn write_json<W: Write>(table: &Table, writer: W) -> Result<(), TableError> {
    let doc = JsonTable {
        independent_axis: table.independent_axis(),
        row_count: table.row_count(),
        columns: table
            .iter()
            .map(|(name, values)| JsonColumn { name, values })
            .collect(),
    };
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

/// Write a table to `path` in the given format
pub fn export_file<P: AsRef<Path>>(
    table: &Table,
    path: P,
    format: ExportFormat,
    metadata: &ExportMetadata,
    config: &ExportConfig,
) -> Result<(), TableError> {
    let path = path.as_ref();
    let file = File::create(path)?;

    match format {
        ExportFormat::Csv => write_csv(table, BufWriter::new(file))?,
        ExportFormat::Json => {
            let mut writer = BufWriter::new(file);
            write_json(table, &mut writer)?;
            writer.flush()?;
        }
        ExportFormat::Parquet => write_parquet(table, file, metadata, config)?,
    }

    info!(
        "Wrote {} rows x {} columns to {} ({})",
        table.row_count(),
        table.column_count(),
        path.display(),
        format
    );
    Ok(())
}
