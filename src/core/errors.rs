use crate::renderer::Locator;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Timed out after {timeout:?} waiting for {locator}")]
    LocatorTimeout { locator: Locator, timeout: Duration },

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Renderer error: {0}")]
    RendererError(String),

    #[error("Target count must be greater than zero, got {0}")]
    InvalidTarget(usize),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

pub type HarvestResult<T> = Result<T, HarvestError>;
