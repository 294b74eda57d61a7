use stride_syntax::VarName;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Unbound name `{0}`")]
    UnboundName(VarName),
    #[error("`{callee}` expects {expected} argument(s) but was given {found}")]
    ArityMismatch { callee: String, expected: usize, found: usize },
    #[error("`{callee}` is a {kind}, not a function")]
    NotCallable { callee: String, kind: &'static str },
    #[error("`{0}` is reserved and cannot be bound")]
    ReservedName(VarName),
    #[error("In {context}: expected {expected}, found {found}")]
    TypeMismatch { context: String, expected: &'static str, found: String },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow in `{0}`")]
    Overflow(&'static str),
    #[error("Index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("Cannot import `{path}`: {reason}")]
    Import { path: String, reason: String },
    #[error("Import cycle through `{0}`")]
    ImportCycle(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EvalError>;
