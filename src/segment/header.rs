use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::SegmentError;

/// Ordered list of distinct column names requested by the caller.
///
/// Order defines output column order. The first entry is the independent
/// (x) axis handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColumnSpec {
    names: Vec<String>,
}

impl ColumnSpec {
    /// Validate and build a column request.
    ///
    /// Rejects an empty list, empty names, names containing whitespace
    /// (they could never equal a token) and duplicates.
    pub fn new<I, S>(names: I) -> Result<Self, SegmentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(SegmentError::MalformedColumnRequest(
                "no columns specified".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.is_empty() {
                return Err(SegmentError::MalformedColumnRequest(
                    "empty column name".to_string(),
                ));
            }
            if name.chars().any(char::is_whitespace) {
                return Err(SegmentError::MalformedColumnRequest(format!(
                    "column name '{}' contains whitespace",
                    name
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(SegmentError::MalformedColumnRequest(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
        }

        Ok(Self { names })
    }

    /// Requested names in output order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the independent axis column
    pub fn independent(&self) -> &str {
        &self.names[0]
    }

    /// Names of the dependent columns (everything after the first)
    pub fn dependent(&self) -> &[String] {
        &self.names[1..]
    }

    /// Number of requested columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no names were requested
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TryFrom<Vec<String>> for ColumnSpec {
    type Error = SegmentError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<ColumnSpec> for Vec<String> {
    fn from(spec: ColumnSpec) -> Self {
        spec.names
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(" "))
    }
}

/// Positions of the requested columns within a recognized header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    /// Token index of each requested column, in `ColumnSpec` order
    positions: Vec<usize>,
    /// Total token count of the header line
    width: usize,
}

impl HeaderMap {
    /// Token index of each requested column, in `ColumnSpec` order
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Total token count of the header line; data rows must match it
    pub fn width(&self) -> usize {
        self.width
    }

    /// Pick the requested values out of a data row already known to be numeric
    pub(crate) fn project(&self, tokens: &[&str]) -> Option<Vec<f64>> {
        self.positions
            .iter()
            .map(|&i| tokens.get(i).and_then(|t| t.parse::<f64>().ok()))
            .collect()
    }
}

/// Decide whether `tokens` is a header line for `spec`.
///
/// Every requested name must occur somewhere in the row; extra tokens are
/// ignored. When a name occurs more than once the lowest index wins.
pub fn detect_header(tokens: &[&str], spec: &ColumnSpec) -> Option<HeaderMap> {
    let positions = spec
        .names()
        .iter()
        .map(|name| tokens.iter().position(|t| *t == name.as_str()))
        .collect::<Option<Vec<_>>>()?;

    Some(HeaderMap {
        positions,
        width: tokens.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(names: &[&str]) -> ColumnSpec {
        ColumnSpec::new(names.iter().copied()).unwrap()
    }

    #[test]
    fn test_column_spec_validation() {
        assert!(matches!(
            ColumnSpec::new(Vec::<String>::new()),
            Err(SegmentError::MalformedColumnRequest(_))
        ));
        assert!(ColumnSpec::new(["Step", "Step"]).is_err());
        assert!(ColumnSpec::new(["Step", ""]).is_err());
        assert!(ColumnSpec::new(["Pot Eng"]).is_err());

        let s = spec(&["Step", "PotEng", "TotEng"]);
        assert_eq!(s.independent(), "Step");
        assert_eq!(s.dependent(), &["PotEng".to_string(), "TotEng".to_string()]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
    }

    #[test]
    fn test_detect_header_with_extra_tokens() {
        let tokens = ["Step", "Temp", "PotEng", "TotEng", "Press"];
        let map = detect_header(&tokens, &spec(&["Step", "TotEng", "PotEng"])).unwrap();
        assert_eq!(map.positions(), &[0, 3, 2]);
        assert_eq!(map.width(), 5);
    }

    #[test]
    fn test_detect_header_missing_name() {
        let tokens = ["Step", "Temp", "PotEng"];
        assert!(detect_header(&tokens, &spec(&["Step", "TotEng"])).is_none());
    }

    #[test]
    fn test_detect_header_first_occurrence_wins() {
        let tokens = ["Step", "E", "Step", "E"];
        let map = detect_header(&tokens, &spec(&["E", "Step"])).unwrap();
        assert_eq!(map.positions(), &[1, 0]);
    }

    #[test]
    fn test_project_reorders() {
        let tokens = ["Step", "Temp", "PotEng"];
        let map = detect_header(&tokens, &spec(&["PotEng", "Step"])).unwrap();
        assert_eq!(map.project(&["10", "300.0", "-5.5"]), Some(vec![-5.5, 10.0]));
    }
}
