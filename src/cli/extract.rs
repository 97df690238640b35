use anyhow::{Context, Result};
use log::info;
use std::io::{self, Write};

use logtable::expr::{apply_operations, NamespacePolicy};
use logtable::segment::{
    scan_file, ColumnSpec, HeaderPolicy, InstanceSelector, SegmentError, SegmentSet,
};
use logtable::table::{
    export_file, parse_legends, write_csv, write_json, CompressionType, ExportConfig,
    ExportFormat, ExportMetadata, PlotMetadata,
};

use super::config::Config;
use super::ExtractArgs;

/// Extract one table from a log and export it
pub fn run(args: ExtractArgs) -> Result<()> {
    let config = Config::load(args.scan.config.as_deref())?;
    let file = &args.scan.file;

    if !file.exists() {
        anyhow::bail!("Input file does not exist: {}", file.display());
    }

    let columns = if args.scan.columns.is_empty() {
        config.extract.columns.clone().unwrap_or_default()
    } else {
        args.scan.columns.clone()
    };
    let columns = ColumnSpec::new(columns).context("No usable columns specified for plotting")?;

    let instance = args
        .instance
        .clone()
        .or_else(|| config.extract.instance.clone())
        .unwrap_or_else(|| "first".to_string());

    let header_policy = args
        .scan
        .header_policy
        .map(HeaderPolicy::from)
        .or(config.extract.header_policy)
        .unwrap_or_default();
    let namespace = args
        .namespace
        .map(NamespacePolicy::from)
        .or(config.extract.namespace)
        .unwrap_or_default();

    // Legend count is checked before scanning
    let plot = plot_metadata(&args, &config)?;
    plot.resolve_legends(columns.dependent())?;

    info!("Input:   {}", file.display());
    info!("Columns: {}", columns);
    info!("Instance: {}", instance);
    info!("Header policy: {}", header_policy);

    let segments = scan_file(file, &columns, header_policy)
        .with_context(|| format!("Failed to scan {}", file.display()))?;
    eprintln!("Total data segments found: {}", segments.len());

    let selector = parse_instance(&segments, &instance)?;
    let segment = segments.select(&selector)?;
    info!(
        "Selected segment at lines {}-{} ({} rows)",
        segment.first_line(),
        segment.last_line(),
        segment.row_count()
    );
    let mut table = segments.select_table(&selector)?;

    let metadata = ExportMetadata {
        source_file: Some(file.display().to_string()),
        instance: Some(selector.to_string()),
        series: columns.dependent().to_vec(),
        plot,
    };

    let operations = if args.operations.is_empty() {
        config.extract.operations.clone().unwrap_or_default()
    } else {
        args.operations.clone()
    };
    if !operations.is_empty() {
        let report = apply_operations(&mut table, &operations, namespace);
        info!(
            "Applied {} of {} operation(s)",
            report.applied_count(),
            operations.len()
        );
    }

    let format = match (args.format, &config.extract.format, &args.outfile) {
        (Some(arg), _, _) => Some(ExportFormat::from(arg)),
        (None, Some(name), _) => Some(name.parse::<ExportFormat>()?),
        (None, None, Some(path)) => Some(ExportFormat::from_path(path)?),
        (None, None, None) => None,
    };

    match &args.outfile {
        Some(path) => {
            let export_config = export_config(&args, &config);
            export_file(
                &table,
                path,
                format.unwrap_or(ExportFormat::Parquet),
                &metadata,
                &export_config,
            )
            .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} rows x {} columns to {}",
                table.row_count(),
                table.column_count(),
                path.display()
            );
        }
        None => write_stdout(&table, format.unwrap_or(ExportFormat::Csv))?,
    }

    Ok(())
}

/// Parse the instance string once the scan is known to have found something
fn parse_instance(segments: &SegmentSet, instance: &str) -> Result<InstanceSelector, SegmentError> {
    if segments.is_empty() {
        return Err(SegmentError::NoSegmentsFound);
    }
    instance.parse()
}

fn plot_metadata(args: &ExtractArgs, config: &Config) -> Result<PlotMetadata> {
    let defaults = PlotMetadata::default();

    let legends = match &args.legends {
        Some(text) => Some(parse_legends(text)?),
        None => config.plot.legends.clone(),
    };

    Ok(PlotMetadata {
        xlabel: args
            .xlabel
            .clone()
            .or_else(|| config.plot.xlabel.clone())
            .unwrap_or(defaults.xlabel),
        ylabel: args
            .ylabel
            .clone()
            .or_else(|| config.plot.ylabel.clone())
            .unwrap_or(defaults.ylabel),
        logscale: args.logscale || config.plot.logscale.unwrap_or(false),
        legends,
    })
}

fn export_config(args: &ExtractArgs, config: &Config) -> ExportConfig {
    let defaults = ExportConfig::default();
    let level = args
        .compression_level
        .or(config.extract.compression_level);

    ExportConfig {
        compression: level.map_or(defaults.compression, CompressionType::Zstd),
        row_group_size: args
            .row_group_size
            .or(config.extract.row_group_size)
            .unwrap_or(defaults.row_group_size),
        ..defaults
    }
}

fn write_stdout(table: &logtable::table::Table, format: ExportFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        ExportFormat::Csv => write_csv(table, &mut handle)?,
        ExportFormat::Json => {
            write_json(table, &mut handle)?;
            writeln!(handle)?;
        }
        ExportFormat::Parquet => {
            anyhow::bail!("Parquet output needs a file; pass --outfile")
        }
    }

    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtable::segment::scan_str;

    fn scan(text: &str) -> SegmentSet {
        let columns = ColumnSpec::new(["t", "v"]).unwrap();
        scan_str(text, &columns, HeaderPolicy::Discard).unwrap()
    }

    #[test]
    fn test_empty_log_reported_before_bad_instance() {
        let segments = scan("no tables in here\n");
        assert!(matches!(
            parse_instance(&segments, "middle"),
            Err(SegmentError::NoSegmentsFound)
        ));
    }

    #[test]
    fn test_bad_instance_with_segments() {
        let segments = scan("t v\n0 1\n");
        assert!(matches!(
            parse_instance(&segments, "middle"),
            Err(SegmentError::InvalidSelector(_))
        ));
        assert_eq!(
            parse_instance(&segments, "last").unwrap(),
            InstanceSelector::Last
        );
    }
}
