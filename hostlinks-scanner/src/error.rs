use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid link: {0}")]
    InvalidLink(String),

    #[error("Crawl unit panicked: {0}")]
    Panic(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
