use thiserror::Error;

/// Main error type for Wikigraph
#[derive(Error, Debug)]
pub enum WikigraphError {
    /// Network, connect or timeout failure talking to a remote endpoint
    #[error("Remote transport error: {0}")]
    RemoteTransport(String),

    /// Remote endpoint answered, but the answer was unusable
    /// (non-success status, malformed body, empty result set)
    #[error("Remote query error: {0}")]
    RemoteQuery(String),

    /// Every lookup tier was exhausted
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Entity data had a shape the graph builder cannot use
    #[error("Graph build error: {0}")]
    GraphBuild(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTML template rendering errors
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<reqwest::Error> for WikigraphError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() || err.is_status() {
            WikigraphError::RemoteQuery(err.to_string())
        } else {
            WikigraphError::RemoteTransport(err.to_string())
        }
    }
}

/// Convenient Result type using WikigraphError
pub type Result<T> = std::result::Result<T, WikigraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WikigraphError::EntityNotFound("Q0".to_string());
        assert!(err.to_string().contains("Entity not found"));
        assert!(err.to_string().contains("Q0"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WikigraphError = io_err.into();
        assert!(matches!(err, WikigraphError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WikigraphError = json_err.into();
        assert!(matches!(err, WikigraphError::Json(_)));
    }
}
