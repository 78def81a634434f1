use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("danmaku text is empty")]
    EmptyText,

    #[error("danmaku text too long: {len} characters (max {max})")]
    TextTooLong { len: usize, max: usize },

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
