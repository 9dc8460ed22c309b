use thiserror::Error;

/// Unified error type for data source lookups and engine operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// No data source registered under this name
    #[error("Unknown data source {0}")]
    UnknownDataSource(String),

    /// No engine factory registered under this name
    #[error("Unknown engine {0}")]
    UnknownEngine(String),

    /// Record not found for the given type and identifier
    #[error("Not found: {type_name} #{id}")]
    NotFound { type_name: String, id: String },

    /// Invalid data source or engine configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value does not have the shape a stored record must have
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Operation not supported by this engine
    #[error("Operation not supported: {0}")]
    OperationNotSupported(String),

    /// IO error (configuration files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine-defined failure (constraint violation, connection loss, ...)
    #[error("Engine error: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Create a "not found" error for a record of `type_name`
    pub fn not_found(type_name: impl Into<String>, id: impl ToString) -> Self {
        StorageError::NotFound {
            type_name: type_name.into(),
            id: id.to_string(),
        }
    }

    /// Create an operation not supported error
    pub fn operation_not_supported(msg: impl Into<String>) -> Self {
        StorageError::OperationNotSupported(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        StorageError::InvalidConfiguration(msg.into())
    }

    /// Wrap an engine's own error type
    pub fn engine(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        StorageError::Engine(Box::new(error))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
