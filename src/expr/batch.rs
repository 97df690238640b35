use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::eval::Namespace;
use super::parser::Expr;
use super::OperationError;
use crate::table::Table;

/// Which columns later operations in a batch can see.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespacePolicy {
    /// Only the table's columns as they were before the batch started.
    /// Overwriting a column does not change what later operations read.
    #[default]
    Snapshot,

    /// Each successful operation's result is visible to the ones after it.
    Chained,
}

impl NamespacePolicy {
    /// Returns all available policy names.
    pub fn variants() -> &'static [&'static str] {
        &["snapshot", "chained"]
    }
}

impl fmt::Display for NamespacePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespacePolicy::Snapshot => write!(f, "snapshot"),
            NamespacePolicy::Chained => write!(f, "chained"),
        }
    }
}

impl FromStr for NamespacePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snapshot" => Ok(NamespacePolicy::Snapshot),
            "chained" | "chain" => Ok(NamespacePolicy::Chained),
            _ => Err(format!(
                "Unknown namespace policy '{}'. Valid options: {}",
                s,
                NamespacePolicy::variants().join(", ")
            )),
        }
    }
}

/// A parsed `name = expression` operation
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    target: String,
    source: String,
    expr: Expr,
}

impl Operation {
    /// Column the result is assigned to
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Right-hand side as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed right-hand side
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl FromStr for Operation {
    type Err = OperationError;

    /// Split on the first `=` and parse the right-hand side.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lhs, rhs) = s
            .split_once('=')
            .ok_or_else(|| OperationError::MissingAssignment(s.to_string()))?;
        let target = lhs.trim();
        let source = rhs.trim();

        if target.is_empty() || target.chars().any(char::is_whitespace) {
            return Err(OperationError::InvalidTarget {
                target: target.to_string(),
                operation: s.to_string(),
            });
        }

        let expr = Expr::parse(source).map_err(|source_err| OperationError::Evaluation {
            target: target.to_string(),
            expression: source.to_string(),
            source: source_err,
        })?;

        Ok(Self {
            target: target.to_string(),
            source: source.to_string(),
            expr,
        })
    }
}

/// What happened to one operation of a batch
#[derive(Debug)]
pub enum OperationOutcome {
    /// The result was stored in the named column
    Applied {
        /// Column written
        target: String,
        /// Whether an existing column was overwritten
        replaced: bool,
    },
    /// The operation failed and the table was left untouched by it
    Skipped {
        /// Operation text as supplied
        operation: String,
        /// Why it was skipped
        error: OperationError,
    },
}

/// Per-operation results of a batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One outcome per operation
    pub outcomes: Vec<OperationOutcome>,
}

impl BatchReport {
    /// Number of operations whose result was stored
    pub fn applied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, OperationOutcome::Applied { .. }))
            .count()
    }

    /// Skipped operations with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &OperationError)> {
        self.outcomes.iter().filter_map(|o| match o {
            OperationOutcome::Skipped { operation, error } => Some((operation.as_str(), error)),
            OperationOutcome::Applied { .. } => None,
        })
    }

    /// Check if any operation was skipped
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Apply `name = expression` operations to a table, in order.
///
/// A failing operation is logged, recorded in the report, and skipped; it
/// never aborts the batch or disturbs columns computed before it.
pub fn apply_operations<S: AsRef<str>>(
    table: &mut Table,
    operations: &[S],
    policy: NamespacePolicy,
) -> BatchReport {
    let mut namespace = Namespace::snapshot(table);
    let mut report = BatchReport::default();

    for text in operations {
        let text = text.as_ref();
        let outcome = match apply_one(table, &mut namespace, text, policy) {
            Ok((target, replaced)) => {
                debug!("Applied operation '{}'", text);
                OperationOutcome::Applied { target, replaced }
            }
            Err(error) => {
                warn!("Skipping operation '{}': {}", text, error);
                OperationOutcome::Skipped {
                    operation: text.to_string(),
                    error,
                }
            }
        };
        report.outcomes.push(outcome);
    }

    report
}

fn apply_one(
    table: &mut Table,
    namespace: &mut Namespace,
    text: &str,
    policy: NamespacePolicy,
) -> Result<(String, bool), OperationError> {
    let op: Operation = text.parse()?;

    let values = namespace
        .eval(op.expr())
        .and_then(|value| value.into_column(table.row_count()))
        .map_err(|source| OperationError::Evaluation {
            target: op.target().to_string(),
            expression: op.source().to_string(),
            source,
        })?;

    let replaced = table.contains(op.target());
    table
        .set_column(op.target(), values.clone())
        .map_err(|source| OperationError::Assignment {
            target: op.target().to_string(),
            source,
        })?;
    if policy == NamespacePolicy::Chained {
        namespace.insert(op.target(), values);
    }

    Ok((op.target, replaced))
}
