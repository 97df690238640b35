//! TOML configuration file support.
//!
//! Settings that are tedious to retype for every run of the same simulation
//! can live in a config file; command-line flags still win:
//!
//! ```toml
//! # logtable.toml
//! [extract]
//! columns = ["Step", "PotEng", "TotEng"]
//! instance = "last"
//! operations = ["KinEng = TotEng - PotEng"]
//! header_policy = "discard"
//! namespace = "snapshot"
//! format = "parquet"
//! compression_level = 9
//!
//! [plot]
//! xlabel = "Timestep"
//! ylabel = "Energy"
//! logscale = false
//! legends = ["PE", "Total"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use logtable::expr::NamespacePolicy;
use logtable::segment::HeaderPolicy;

/// Root configuration structure for logtable.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Extraction settings.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Plot labelling settings.
    #[serde(default)]
    pub plot: PlotConfig,
}

/// Configuration for scanning and extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Column names, x axis first.
    pub columns: Option<Vec<String>>,

    /// Instance selector: "first", "last", or a 1-based number.
    pub instance: Option<String>,

    /// Derived-column operations.
    pub operations: Option<Vec<String>>,

    /// Header-while-collecting policy.
    pub header_policy: Option<HeaderPolicy>,

    /// Namespace policy for operations.
    pub namespace: Option<NamespacePolicy>,

    /// Output format name.
    pub format: Option<String>,

    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,

    /// Rows per Parquet row group.
    pub row_group_size: Option<usize>,
}

/// Configuration for plot labels.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotConfig {
    /// Label for the x axis.
    pub xlabel: Option<String>,

    /// Label for the y axis.
    pub ylabel: Option<String>,

    /// Logarithmic y axis.
    pub logscale: Option<bool>,

    /// One legend per plotted column.
    pub legends: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file if a path was given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [extract]
            columns = ["Step", "PotEng", "TotEng"]
            instance = "last"
            operations = ["KinEng = TotEng - PotEng"]
            header_policy = "flush"
            namespace = "chained"
            format = "csv"
            compression_level = 9

            [plot]
            xlabel = "Timestep"
            logscale = true
            legends = ["PE", "Total"]
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(
            config.extract.columns,
            Some(vec![
                "Step".to_string(),
                "PotEng".to_string(),
                "TotEng".to_string()
            ])
        );
        assert_eq!(config.extract.instance.as_deref(), Some("last"));
        assert_eq!(config.extract.header_policy, Some(HeaderPolicy::Flush));
        assert_eq!(config.extract.namespace, Some(NamespacePolicy::Chained));
        assert_eq!(config.extract.compression_level, Some(9));
        assert_eq!(config.plot.xlabel.as_deref(), Some("Timestep"));
        assert_eq!(config.plot.ylabel, None);
        assert_eq!(config.plot.logscale, Some(true));
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert!(config.extract.columns.is_none());
        assert!(config.plot.legends.is_none());
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let toml = r#"
            [extract]
            header_policy = "merge"
        "#;
        assert!(Config::from_str(toml).is_err());
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(Config::from_str("[extract]\ncolumn = [\"Step\"]\n").is_err());
    }
}
