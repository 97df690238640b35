use std::collections::HashMap;

use super::functions::{lookup_constant, lookup_function, Function};
use super::parser::{BinaryOp, Expr, UnaryOp};
use super::ExprError;
use crate::table::Table;

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single number, broadcast against columns
    Scalar(f64),
    /// One value per row
    Vector(Vec<f64>),
}

impl Value {
    /// Expand to `rows` values, broadcasting a scalar
    pub fn into_column(self, rows: usize) -> Result<Vec<f64>, ExprError> {
        match self {
            Value::Scalar(v) => Ok(vec![v; rows]),
            Value::Vector(values) if values.len() == rows => Ok(values),
            Value::Vector(values) => Err(ExprError::ShapeMismatch {
                left: rows,
                right: values.len(),
            }),
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(v) => Value::Scalar(f(v)),
            Value::Vector(values) => Value::Vector(values.into_iter().map(f).collect()),
        }
    }

    fn zip_with(self, other: Value, f: impl Fn(f64, f64) -> f64) -> Result<Value, ExprError> {
        Ok(match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f(a, b)),
            (Value::Vector(a), Value::Scalar(b)) => {
                Value::Vector(a.into_iter().map(|x| f(x, b)).collect())
            }
            (Value::Scalar(a), Value::Vector(b)) => {
                Value::Vector(b.into_iter().map(|y| f(a, y)).collect())
            }
            (Value::Vector(a), Value::Vector(b)) => {
                if a.len() != b.len() {
                    return Err(ExprError::ShapeMismatch {
                        left: a.len(),
                        right: b.len(),
                    });
                }
                Value::Vector(a.into_iter().zip(b).map(|(x, y)| f(x, y)).collect())
            }
        })
    }

    fn reduce(self, f: fn(&[f64]) -> f64) -> Value {
        match self {
            Value::Scalar(v) => Value::Scalar(f(&[v])),
            Value::Vector(values) => Value::Scalar(f(&values)),
        }
    }
}

/// Columns visible to an expression.
///
/// Built once from a table; later changes to the table are not seen unless
/// the caller inserts them explicitly.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    columns: HashMap<String, Vec<f64>>,
    rows: usize,
}

impl Namespace {
    /// Capture every column of `table` as it is now
    pub fn snapshot(table: &Table) -> Self {
        Self {
            columns: table
                .iter()
                .map(|(name, values)| (name.to_string(), values.to_vec()))
                .collect(),
            rows: table.row_count(),
        }
    }

    /// Row count shared by all columns
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Values of a visible column
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Make a column visible, replacing any previous values
    pub fn insert(&mut self, name: &str, values: Vec<f64>) {
        self.columns.insert(name.to_string(), values);
    }

    /// Evaluate an expression over the visible columns
    pub fn eval(&self, expr: &Expr) -> Result<Value, ExprError> {
        match expr {
            Expr::Const(n) => Ok(Value::Scalar(*n)),
            Expr::Name(name) => self
                .get(name)
                .map(|values| Value::Vector(values.to_vec()))
                .or_else(|| lookup_constant(name).map(Value::Scalar))
                .ok_or_else(|| ExprError::UnknownName(name.clone())),
            Expr::Column(name) => self
                .get(name)
                .map(|values| Value::Vector(values.to_vec()))
                .ok_or_else(|| ExprError::UnknownName(name.clone())),
            Expr::Op1(UnaryOp::Plus, operand) => self.eval(operand),
            Expr::Op1(UnaryOp::Neg, operand) => Ok(self.eval(operand)?.map(|v| -v)),
            Expr::Op2(op, left, right) => {
                let op: BinaryOp = *op;
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                left.zip_with(right, |a, b| op.apply(a, b))
            }
            Expr::Call(name, args) => self.call(name, args),
        }
    }

    fn call(&self, name: &str, args: &[Expr]) -> Result<Value, ExprError> {
        let function =
            lookup_function(name).ok_or_else(|| ExprError::UnknownFunction(name.to_string()))?;

        if args.len() != function.arity() {
            return Err(ExprError::Arity {
                function: name.to_string(),
                expected: function.arity(),
                actual: args.len(),
            });
        }

        match function {
            Function::Unary(f) => Ok(self.eval(&args[0])?.map(f)),
            Function::Reduce(f) => Ok(self.eval(&args[0])?.reduce(f)),
            Function::Binary(f) => {
                let a = self.eval(&args[0])?;
                let b = self.eval(&args[1])?;
                a.zip_with(b, f)
            }
        }
    }
}
