use anyhow::{Context, Result};
use log::info;

#[cfg(feature = "colorized_output")]
use console::style;

use logtable::segment::{scan_file, ColumnSpec, HeaderPolicy, SegmentSet};

use super::config::Config;
use super::ScanOptions;

/// List every segment found in a log
pub fn run(options: ScanOptions) -> Result<()> {
    let config = Config::load(options.config.as_deref())?;

    if !options.file.exists() {
        anyhow::bail!("Input file does not exist: {}", options.file.display());
    }

    let columns = if options.columns.is_empty() {
        config.extract.columns.unwrap_or_default()
    } else {
        options.columns
    };
    let columns = ColumnSpec::new(columns).context("No usable columns specified")?;

    let policy = options
        .header_policy
        .map(HeaderPolicy::from)
        .or(config.extract.header_policy)
        .unwrap_or_default();
    info!("Scanning {} for: {} (header policy: {})", options.file.display(), columns, policy);

    let segments = scan_file(&options.file, &columns, policy)
        .with_context(|| format!("Failed to scan {}", options.file.display()))?;

    print!("{}", format_report(&segments, &options.file.display().to_string()));
    Ok(())
}

fn format_report(segments: &SegmentSet, file: &str) -> String {
    let mut output = String::new();

    #[cfg(feature = "colorized_output")]
    {
        output.push_str(&format!("{}\n", style("logtable Scan Report").bold().cyan()));
        output.push_str(&format!("{}\n", style("====================").cyan()));
    }
    #[cfg(not(feature = "colorized_output"))]
    {
        output.push_str("logtable Scan Report\n");
        output.push_str("====================\n");
    }

    output.push_str(&format!("File: {}\n", file));
    output.push_str(&format!("Columns: {}\n", segments.columns()));
    output.push_str(&format!("Total data segments found: {}\n", segments.len()));

    if segments.is_empty() {
        output.push_str("No valid data segments found.\n");
        return output;
    }

    output.push('\n');
    output.push_str(&format!(
        "{:>4}  {:>8}  {:>17}  {:>8}  {:>5}\n",
        "#", "header", "data lines", "rows", "width"
    ));
    for (i, segment) in segments.iter().enumerate() {
        output.push_str(&format!(
            "{:>4}  {:>8}  {:>17}  {:>8}  {:>5}\n",
            i + 1,
            segment.header_line(),
            format!("{}-{}", segment.first_line(), segment.last_line()),
            segment.row_count(),
            segment.width()
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtable::segment::scan_str;

    #[test]
    fn test_format_report() {
        let columns = ColumnSpec::new(["t", "v"]).unwrap();
        let set = scan_str("t v\n0 1\n1 2\n\nt v\n5 6\n", &columns, HeaderPolicy::Discard).unwrap();
        let report = format_report(&set, "run.log");

        assert!(report.contains("Total data segments found: 2"));
        assert!(report.contains("2-3"));
        assert!(report.contains("6-6"));
    }

    #[test]
    fn test_format_report_empty() {
        let columns = ColumnSpec::new(["t"]).unwrap();
        let set = scan_str("nothing here\n", &columns, HeaderPolicy::Discard).unwrap();
        assert!(format_report(&set, "run.log").contains("No valid data segments found."));
    }
}
