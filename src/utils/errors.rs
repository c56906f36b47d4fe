use thiserror::Error;

/// Price payload could not be turned into a usable series
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("No price data returned")]
    Empty,
    #[error("Malformed price data: {0}")]
    Malformed(String),
}

/// A rendering target the dashboard expects is not present in the document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{0} element not found")]
    TargetMissing(&'static str),
}
