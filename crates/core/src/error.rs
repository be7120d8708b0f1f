use thiserror::Error;

/// Core error types for the contract package manager
#[derive(Debug, Error)]
pub enum Error {
    /// Generic error with a message
    #[error("{0}")]
    Generic(String),

    /// Error when parsing data
    #[error("Failed to parse data: {0}")]
    Parse(String),

    /// Malformed manifest or an ABI type outside the known set
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    /// Directory or file could not be created or written
    #[error("Resource error: {0}")]
    Resource(String),

    /// A built-in template failed to register or render
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid configuration or unsupported request
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error related to network operations
    #[error("Network error: {0}")]
    Network(String),

    /// The external downloader failed
    #[error("Download error: {0}")]
    Download(String),

    /// Any other error with its source
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a new generic error
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a new manifest error
    pub fn manifest<S: Into<String>>(msg: S) -> Self {
        Error::Manifest(msg.into())
    }

    /// Create a new resource error
    pub fn resource<S: Into<String>>(msg: S) -> Self {
        Error::Resource(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Error::Template(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network(msg.into())
    }

    /// Create a new download error
    pub fn download<S: Into<String>>(msg: S) -> Self {
        Error::Download(msg.into())
    }

    /// Whether the error only affects the current generation target.
    ///
    /// Resource errors leave other languages and contracts untouched, so callers
    /// looping over targets can keep going.
    pub fn is_resource(&self) -> bool {
        matches!(self, Error::Resource(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Generic(s.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(format!("JSON parsing error: {}", err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Resource(format!("I/O error: {}", err))
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_resource_errors() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(err.is_resource());
        assert!(err.to_string().starts_with("Resource error"));
    }

    #[test]
    fn test_json_errors_are_parse_errors() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
