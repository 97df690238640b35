use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TableError;

/// Current logtable export format version
pub const LOGTABLE_FORMAT_VERSION: &str = "1.0";

/// Footer key: export format version
pub const KEY_FORMAT_VERSION: &str = "logtable:format_version";
/// Footer key: RFC 3339 export timestamp
pub const KEY_CREATED: &str = "logtable:created";
/// Footer key: generator name and version
pub const KEY_GENERATOR: &str = "logtable:generator";
/// Footer key: log file the table was extracted from
pub const KEY_SOURCE_FILE: &str = "logtable:source_file";
/// Footer key: instance selector used to pick the segment
pub const KEY_INSTANCE: &str = "logtable:instance";
/// Footer key: name of the x-axis column
pub const KEY_INDEPENDENT_AXIS: &str = "logtable:independent_axis";
/// Footer key: JSON list of plotted series with their legends
pub const KEY_SERIES: &str = "logtable:series";
/// Footer key: JSON plot settings
pub const KEY_PLOT: &str = "logtable:plot";

/// Axis and legend settings handed to whatever renders the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotMetadata {
    /// Label for the x axis
    pub xlabel: String,

    /// Label for the y axis
    pub ylabel: String,

    /// Use a logarithmic y axis
    pub logscale: bool,

    /// One legend per dependent column, if supplied
    pub legends: Option<Vec<String>>,
}

impl Default for PlotMetadata {
    fn default() -> Self {
        Self {
            xlabel: "X-axis".to_string(),
            ylabel: "Y-axis".to_string(),
            logscale: false,
            legends: None,
        }
    }
}

impl PlotMetadata {
    /// Legend text for each plotted series.
    ///
    /// Explicit legends must match the series count. Without them a lone
    /// series is labelled `Data` and several series use their column names.
    pub fn resolve_legends(&self, series: &[String]) -> Result<Vec<String>, TableError> {
        match &self.legends {
            Some(legends) if legends.len() != series.len() => {
                Err(TableError::InvalidLegends(format!(
                    "{} legend(s) given for {} plotted column(s)",
                    legends.len(),
                    series.len()
                )))
            }
            Some(legends) => Ok(legends.clone()),
            None if series.len() == 1 => Ok(vec!["Data".to_string()]),
            None => Ok(series.to_vec()),
        }
    }
}

/// Parse a legend list written as a JSON array of strings, e.g. `["PE","Total"]`
pub fn parse_legends(text: &str) -> Result<Vec<String>, TableError> {
    serde_json::from_str(text).map_err(|e| {
        TableError::InvalidLegends(format!(
            "expected a list such as '[\"label1\", \"label2\"]': {}",
            e
        ))
    })
}

/// A plotted series: a dependent column and its legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Series {
    column: String,
    legend: String,
}

/// Provenance and rendering hints stored alongside an exported table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportMetadata {
    /// Log file the table came from
    pub source_file: Option<String>,

    /// Instance selector used (`first`, `last`, or a number)
    pub instance: Option<String>,

    /// Dependent columns to plot against the independent axis
    pub series: Vec<String>,

    /// Axis and legend settings
    pub plot: PlotMetadata,
}

impl ExportMetadata {
    /// Build key-value metadata for the Parquet footer.
    pub fn to_parquet_metadata(
        &self,
        independent_axis: &str,
    ) -> Result<HashMap<String, String>, TableError> {
        let mut metadata = HashMap::new();

        metadata.insert(
            KEY_FORMAT_VERSION.to_string(),
            LOGTABLE_FORMAT_VERSION.to_string(),
        );
        metadata.insert(KEY_CREATED.to_string(), chrono::Utc::now().to_rfc3339());
        metadata.insert(
            KEY_GENERATOR.to_string(),
            format!("logtable v{}", env!("CARGO_PKG_VERSION")),
        );
        metadata.insert(
            KEY_INDEPENDENT_AXIS.to_string(),
            independent_axis.to_string(),
        );

        if let Some(ref source) = self.source_file {
            metadata.insert(KEY_SOURCE_FILE.to_string(), source.clone());
        }

        if let Some(ref instance) = self.instance {
            metadata.insert(KEY_INSTANCE.to_string(), instance.clone());
        }

        if !self.series.is_empty() {
            let legends = self.plot.resolve_legends(&self.series)?;
            let series: Vec<Series> = self
                .series
                .iter()
                .zip(legends)
                .map(|(column, legend)| Series {
                    column: column.clone(),
                    legend,
                })
                .collect();
            metadata.insert(KEY_SERIES.to_string(), serde_json::to_string(&series)?);
        }

        metadata.insert(KEY_PLOT.to_string(), serde_json::to_string(&self.plot)?);

        Ok(metadata)
    }
}
