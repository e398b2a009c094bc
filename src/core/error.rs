use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Class '{0}' not found")]
    ClassNotFound(String),

    #[error("Class '{0}' already exists")]
    ClassExists(String),

    #[error("Proxy artifact not found at '{}'", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("Proxy artifact '{}' is corrupt: {}", .0.display(), .1)]
    ArtifactCorrupt(PathBuf, String),

    #[error("Proxy class '{0}' is not loaded")]
    ProxyClassNotLoaded(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing value for identifier field '{1}' of class '{0}'")]
    MissingIdentifier(String, String),

    #[error("Field '{1}' not found in class '{0}'")]
    UnknownField(String, String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Entity '{0}' with identifier {1} not found")]
    EntityNotFound(String, String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

pub type Result<T> = std::result::Result<T, ProxyError>;

impl ProxyError {
    pub fn uninitialized_proxy_expected(proxy_class_name: &str) -> Self {
        Self::InvalidArgument(format!(
            "uninitialized proxy expected, '{}' is already initialized",
            proxy_class_name
        ))
    }
}

impl<T> From<std::sync::PoisonError<T>> for ProxyError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
