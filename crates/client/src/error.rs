use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Raised by transports that do not go through reqwest.
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to decode JSON:API document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unknown filter operator `{0}`")]
    UnknownOperator(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
