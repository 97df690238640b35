use crate::table::TableError;

/// Errors raised while lexing, parsing or evaluating an expression
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    /// Malformed expression text
    #[error("parse error at offset {position}: {message}")]
    Parse {
        /// Byte offset into the expression
        position: usize,
        /// What went wrong
        message: String,
    },

    /// Identifier is neither a visible column nor a constant
    #[error("name '{0}' is not defined")]
    UnknownName(String),

    /// Call to a function that is not built in
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Function called with the wrong number of arguments
    #[error("{function}() takes {expected} argument(s), {actual} given")]
    Arity {
        /// Function name
        function: String,
        /// Arguments the function takes
        expected: usize,
        /// Arguments supplied
        actual: usize,
    },

    /// Elementwise operation on columns of different length
    #[error("operands could not be broadcast together with lengths {left} and {right}")]
    ShapeMismatch {
        /// Length of the left operand
        left: usize,
        /// Length of the right operand
        right: usize,
    },
}

impl ExprError {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        ExprError::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Why a single `name = expression` operation was skipped
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// No `=` in the operation string
    #[error("operation '{0}' is not of the form 'name = expression'")]
    MissingAssignment(String),

    /// Left-hand side is empty or not a usable column name
    #[error("invalid target column '{target}' in operation '{operation}'")]
    InvalidTarget {
        /// Offending left-hand side
        target: String,
        /// Full operation text
        operation: String,
    },

    /// The right-hand side failed to parse or evaluate
    #[error("error evaluating expression '{expression}' for column '{target}': {source}")]
    Evaluation {
        /// Column the result would have been assigned to
        target: String,
        /// Right-hand side text
        expression: String,
        /// Underlying failure
        #[source]
        source: ExprError,
    },

    /// The result could not be stored in the table
    #[error("cannot assign column '{target}': {source}")]
    Assignment {
        /// Column being assigned
        target: String,
        /// Underlying failure
        #[source]
        source: TableError,
    },
}
