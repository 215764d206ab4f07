//! Common error types used throughout catalog-ingest.
//!
//! The variants follow the failure classes of an ingestion run: talking to
//! the catalog API, interpreting its response, and writing to the document
//! store. The remaining variants cover configuration and I/O.

/// Common error type for catalog-ingest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response (connect, TLS, body read).
    #[error("HTTP request to {endpoint} (page {page}) failed: {message}")]
    Http {
        endpoint: String,
        page: u32,
        message: String,
    },

    /// The catalog API answered with a non-success status.
    #[error("{endpoint} (page {page}) returned HTTP {status}")]
    Status {
        endpoint: String,
        page: u32,
        status: u16,
    },

    /// The response body could not be interpreted.
    #[error("Malformed response from {endpoint} (page {page}): {message}")]
    MalformedResponse {
        endpoint: String,
        page: u32,
        message: String,
    },

    /// A document store operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration could not be used.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new Http error.
    pub fn http<E: Into<String>, M: Into<String>>(endpoint: E, page: u32, message: M) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            page,
            message: message.into(),
        }
    }

    /// Create a new MalformedResponse error.
    pub fn malformed<E: Into<String>, M: Into<String>>(
        endpoint: E,
        page: u32,
        message: M,
    ) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            page,
            message: message.into(),
        }
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the failure came from the catalog API rather than the store.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Status { .. } | Self::MalformedResponse { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
