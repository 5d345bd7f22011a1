//! Top-level error for the `idem-pay` binary.

use thiserror::Error;

use crate::csv::CsvError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] CsvError),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
