use thiserror::Error;

/// Errors raised by the catalog core
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Coarse error classification the shell keys its messages on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Shape,
    Config,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Network(_) => ErrorKind::Network,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Shape(_) => ErrorKind::Shape,
            CatalogError::Config(_) | CatalogError::Io(_) | CatalogError::Yaml(_) => {
                ErrorKind::Config
            }
        }
    }

    /// Shorthand for a missing field at `path` in a record fetched from `source`
    pub fn missing(source: &str, path: &str) -> Self {
        CatalogError::Shape(format!("{source}: missing field `{path}`"))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            return CatalogError::NotFound(
                err.url().map(|u| u.to_string()).unwrap_or_default(),
            );
        }
        if err.is_decode() {
            return CatalogError::Shape(err.to_string());
        }
        CatalogError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Shape(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
