use thiserror::Error;

/// Failures at the file and export boundary. The analytical core itself
/// degrades to empty results instead of returning these.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No data: {0}")]
    NoData(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
