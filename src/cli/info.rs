use anyhow::{Context, Result};
use parquet::format::KeyValue;
use std::path::PathBuf;

use logtable::table::{
    KEY_FORMAT_VERSION, KEY_INDEPENDENT_AXIS, KEY_INSTANCE, KEY_PLOT, KEY_SERIES, KEY_SOURCE_FILE,
};

/// Display information about a Parquet file written by `extract`
pub fn run(file: PathBuf) -> Result<()> {
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use std::fs::File;

    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let file_handle = File::open(&file).context("Failed to open file")?;
    let reader = SerializedFileReader::new(file_handle).context("Failed to read Parquet file")?;

    let metadata = reader.metadata();
    let file_metadata = metadata.file_metadata();

    println!("logtable File Information");
    println!("=========================");
    println!("File: {}", file.display());
    println!();

    println!("Table:");
    println!("  Rows: {}", file_metadata.num_rows());
    println!(
        "  Columns: {}",
        file_metadata.schema_descr().num_columns()
    );
    println!("  Row groups: {}", metadata.num_row_groups());
    println!();

    let kv = file_metadata.key_value_metadata();

    if lookup(kv, KEY_FORMAT_VERSION).is_none() {
        println!("Note: no logtable metadata found; this file was not written by logtable.");
        println!();
    } else {
        println!("Provenance:");
        for (label, key) in [
            ("Format version", KEY_FORMAT_VERSION),
            ("Source file", KEY_SOURCE_FILE),
            ("Instance", KEY_INSTANCE),
            ("X axis", KEY_INDEPENDENT_AXIS),
            ("Series", KEY_SERIES),
            ("Plot", KEY_PLOT),
        ] {
            println!("  {}: {}", label, lookup(kv, key).unwrap_or("<none>"));
        }
        println!();
    }

    if let Some(kv_metadata) = kv {
        println!("Metadata Keys:");
        for entry in kv_metadata {
            let value_preview = entry
                .value
                .as_ref()
                .map(|v| {
                    if v.chars().count() > 100 {
                        let head: String = v.chars().take(100).collect();
                        format!("{}... ({} bytes)", head, v.len())
                    } else {
                        v.clone()
                    }
                })
                .unwrap_or_else(|| "<null>".to_string());
            println!("  {}: {}", entry.key, value_preview);
        }
        println!();
    }

    println!("Schema:");
    for i in 0..file_metadata.schema_descr().num_columns() {
        let col = file_metadata.schema_descr().column(i);
        println!("  {:3}. {} ({})", i + 1, col.name(), col.physical_type());
    }

    Ok(())
}

fn lookup<'a>(kv: Option<&'a Vec<KeyValue>>, key: &str) -> Option<&'a str> {
    kv?.iter()
        .find(|entry| entry.key == key)
        .and_then(|entry| entry.value.as_deref())
}
