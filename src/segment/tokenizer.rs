//! Line tokenizer.

/// Split a raw log line into its non-empty whitespace-delimited tokens.
///
/// Runs of whitespace collapse and leading/trailing whitespace is dropped,
/// so a blank line yields an empty row.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Returns true if every token parses as a floating-point number.
///
/// Accepts the forms `f64::from_str` does, including `inf` and `nan`.
pub fn all_numeric(tokens: &[&str]) -> bool {
    tokens.iter().all(|t| t.parse::<f64>().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(
            tokenize("  Step \t PotEng    TotEng \r\n"),
            vec!["Step", "PotEng", "TotEng"]
        );
    }

    #[test]
    fn test_tokenize_blank_line() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t \n").is_empty());
    }

    #[test]
    fn test_all_numeric() {
        assert!(all_numeric(&["0", "1.5", "-2e-3", "+.5", "inf", "NaN"]));
        assert!(!all_numeric(&["0", "1.5", "WARNING:"]));
        assert!(all_numeric(&[]));
    }
}
