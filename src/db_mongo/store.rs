use mongodb::bson::Document;

use super::connection::{ConnectionConfig, ConnectionFactory, ConnectionHandle, MongoConnectionFactory};
use super::error::{DriverError, StoreError};
use super::models::{DeleteSummary, InsertSummary, UpdateRequest, UpdateSummary};

/// Runs single operations against a collection, each on its own connection.
///
/// Every method connects, performs exactly one driver call and closes the
/// connection before returning, whether the call succeeded or not. Nothing
/// is shared between calls, so concurrent callers each open their own
/// connection.
pub struct DocumentStore<F = MongoConnectionFactory> {
    factory: F,
}

impl DocumentStore<MongoConnectionFactory> {
    pub fn mongo(config: ConnectionConfig) -> Self {
        Self::new(MongoConnectionFactory::new(config))
    }
}

impl<F: ConnectionFactory> DocumentStore<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Every document in `collection`.
    pub async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let handle = self.acquire().await?;
        let outcome = handle.find_all(collection).await;
        Self::release(handle, collection, outcome).await
    }

    /// Inserts `documents` in a single driver call.
    pub async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<InsertSummary, StoreError> {
        let handle = self.acquire().await?;
        let outcome = handle.insert_many(collection, documents).await;
        Self::release(handle, collection, outcome).await
    }

    /// Deletes at most one document matching `filter`. No match is a
    /// successful zero-count delete.
    pub async fn remove_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteSummary, StoreError> {
        let handle = self.acquire().await?;
        let outcome = handle.delete_one(collection, filter).await;
        Self::release(handle, collection, outcome).await
    }

    /// Applies `request.update` as a `$set` patch to every matching document.
    ///
    /// **Without a filter this updates every document in the collection.**
    pub async fn update_many(
        &self,
        collection: &str,
        request: UpdateRequest,
    ) -> Result<UpdateSummary, StoreError> {
        let UpdateRequest { filter, update } = request;
        let filter = filter.unwrap_or_default();

        let handle = self.acquire().await?;
        let outcome = handle.update_many(collection, filter, update).await;
        Self::release(handle, collection, outcome).await
    }

    async fn acquire(&self) -> Result<F::Handle, StoreError> {
        self.factory.connect().await.map_err(StoreError::Connection)
    }

    // Closes the handle on both paths before the outcome reaches the caller.
    async fn release<T>(
        handle: F::Handle,
        collection: &str,
        outcome: Result<T, DriverError>,
    ) -> Result<T, StoreError> {
        handle.close().await;

        outcome.map_err(|source| {
            tracing::debug!(collection, "Store operation failed: {}", source);
            StoreError::Operation {
                collection: collection.to_string(),
                source,
            }
        })
    }
}
