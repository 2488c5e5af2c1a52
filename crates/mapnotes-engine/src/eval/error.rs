use thiserror::Error;

use super::builtins::Arity;

/// Why a formula could not produce a value.
///
/// The `Display` text is what ends up next to the formula in the document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("{0} is not defined")]
    UnknownName(String),

    #[error("{0} is not a function")]
    UnknownFunction(String),

    #[error("{name} expects {expected} arguments, got {found}")]
    Arity {
        name: String,
        expected: Arity,
        found: usize,
    },

    #[error("cannot apply `{op}` to {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("cannot apply `{op}` to {operand}")]
    UnaryTypeMismatch {
        op: &'static str,
        operand: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid argument to {function}: {message}")]
    InvalidArgument { function: String, message: String },
}
