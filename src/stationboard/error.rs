#[derive(thiserror::Error, Debug)]
pub enum StationboardError {
    #[error("Init error: {0}")]
    Init(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error response: {0}")]
    Status(u16),

    #[error("Deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

pub type StationboardResult<T> = Result<T, StationboardError>;
