use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("persisted state unreadable: {0}")]
    MalformedState(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("secure random source unavailable: {0}")]
    Entropy(#[from] rand::Error),
}

pub type AppResult<T> = Result<T, AppError>;
