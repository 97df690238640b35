//! # Derived-Column Expressions
//!
//! Small arithmetic language for adding columns to a [`Table`](crate::table::Table),
//! e.g. `KinEng = TotEng - PotEng` or `logP = log10(abs(Press))`.
//!
//! Expressions are lexed and parsed by this module into an [`Expr`] tree
//! and evaluated directly over column vectors. Nothing outside the visible
//! columns, the built-in functions and the named constants is reachable.
//!
//! ## Grammar
//!
//! ```text
//! expr    := sum
//! sum     := product (("+" | "-") product)*
//! product := unary (("*" | "/" | "%") unary)*
//! unary   := ("+" | "-") unary | power
//! power   := atom ("**" unary)?
//! atom    := NUMBER | IDENT | `quoted name` | IDENT "(" args? ")" | "(" expr ")"
//! ```
//!
//! ## Batches
//!
//! [`apply_operations`] runs `name = expression` strings in order. Under the
//! default [`NamespacePolicy::Snapshot`] every operation sees the table as it
//! was before the batch, so `["a = x + y", "b = a * 2"]` adds `a` and skips
//! the second operation. [`NamespacePolicy::Chained`] makes each result
//! visible to later operations.

mod batch;
mod error;
mod eval;
mod functions;
mod lexer;
mod parser;


pub use batch::{apply_operations, BatchReport, NamespacePolicy, Operation, OperationOutcome};
pub use error::{ExprError, OperationError};
pub use eval::{Namespace, Value};
pub use functions::{lookup_constant, lookup_function, Function};
pub use parser::{BinaryOp, Expr, UnaryOp, MAX_DEPTH};
