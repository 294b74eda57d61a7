use std::path::PathBuf;
use stride_dynamics::EvalError;
use stride_surface::SurfaceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Source file `{}` unreadable: {}", .0.display(), .1)]
    SrcFileUnreadable(PathBuf, std::io::Error),
    #[error("Configuration file not found: `{}`", .0.display())]
    ConfNotFound(PathBuf),
    #[error("Configuration file at `{}` invalid: {}", .0.display(), .1)]
    ConfInvalid(PathBuf, std::io::Error),
    #[error("{0}")]
    SurfaceError(#[from] SurfaceError),
    #[error("Runtime error: {0}")]
    EvalError(#[from] EvalError),
    #[error("Test failed:\n\t{0}")]
    TestFailed(String),
}

pub type Result<T> = std::result::Result<T, DriverError>;
