use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    StatusError { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON parse error for {url}: {source}")]
    JsonError {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid site.json format: {0}")]
    InvalidDescriptor(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
