//! Documentation pipeline error types.

/// Errors that can occur while loading configuration or rewriting documentation.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The typesystem configuration is structurally invalid.
    #[error("invalid typesystem: {detail}")]
    InvalidTypesystem { detail: String },

    /// The XSLT engine rejected the program or the input.
    #[error("transform failed: {detail}")]
    Transform { detail: String },

    /// The query engine could not evaluate a query.
    #[error("query failed: {detail}")]
    Query { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for documentation operations.
pub type Result<T> = std::result::Result<T, DocError>;
