use std::fmt;
use std::str::FromStr;

use super::SegmentError;

/// User-facing choice of one segment among all segments in a log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InstanceSelector {
    /// The first segment in the file
    #[default]
    First,
    /// The last segment in the file
    Last,
    /// A 1-based position, as typed by the user (0 is kept so it can be rejected)
    Nth(u64),
}

impl InstanceSelector {
    /// Resolve to a zero-based index into a store of `available` segments.
    pub fn resolve(&self, available: usize) -> Result<usize, SegmentError> {
        if available == 0 {
            return Err(SegmentError::NoSegmentsFound);
        }

        let index: i64 = match self {
            InstanceSelector::First => 0,
            InstanceSelector::Last => available as i64 - 1,
            InstanceSelector::Nth(k) => i64::try_from(*k).map_or(i64::MAX, |k| k - 1),
        };

        if index < 0 || index >= available as i64 {
            return Err(SegmentError::SelectorOutOfRange { index, available });
        }

        Ok(index as usize)
    }
}

impl FromStr for InstanceSelector {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(InstanceSelector::First),
            "last" => Ok(InstanceSelector::Last),
            digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                // Digit strings too large for u64 are still well-formed; they
                // just can never be in range.
                Ok(InstanceSelector::Nth(digits.parse().unwrap_or(u64::MAX)))
            }
            other => Err(SegmentError::InvalidSelector(other.to_string())),
        }
    }
}

impl fmt::Display for InstanceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceSelector::First => write!(f, "first"),
            InstanceSelector::Last => write!(f, "last"),
            InstanceSelector::Nth(k) => write!(f, "{}", k),
        }
    }
}
