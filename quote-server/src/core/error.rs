use thiserror::Error;

use crate::db::RepoError;

/// Startup and serve-loop failures
///
/// Request-level failures are `AppError`s; these never reach a client.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("Failed to open rule store: {0}")]
    Store(#[from] RepoError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
