use thiserror::Error;

/// Untransformed error reported by the database driver.
pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The connection could not be established; no operation was attempted.
    #[error("failed to connect to MongoDB: {0}")]
    Connection(#[source] DriverError),

    #[error("operation on collection `{collection}` failed: {source}")]
    Operation {
        collection: String,
        #[source]
        source: DriverError,
    },
}

impl StoreError {
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }
}
