use akhra_config::ConfigError;
use akhra_core::CoreError;
use thiserror::Error;

/// Unified error type for the book manager and everything built on it.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No books loaded. Use `book new` or `book load` first.")]
    BooksNotLoaded,
    #[error("Books are unnamed; save them with a name first")]
    Unnamed,
    #[error(transparent)]
    Core(CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BooksNotLoaded => AppError::BooksNotLoaded,
            other => AppError::Core(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
