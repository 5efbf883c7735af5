pub mod connection;
pub mod error;
pub mod models;
pub mod store;

#[cfg(test)]
pub mod memory;

pub use connection::{ConnectionConfig, ConnectionFactory, ConnectionHandle, MongoConnectionFactory};
pub use error::{DriverError, StoreError};
pub use models::{DeleteSummary, InsertSummary, UpdateRequest, UpdateSummary};
pub use store::DocumentStore;
