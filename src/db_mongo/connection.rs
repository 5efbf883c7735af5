//! Connection acquisition for the document store.
//!
//! A [`ConnectionFactory`] hands out one [`ConnectionHandle`] per store
//! operation. The handle carries the four driver calls the store needs and is
//! consumed by [`ConnectionHandle::close`], so a handle can never be reused
//! once the operation that opened it is finished.

use std::future::Future;

use mongodb::{
    Client, Database,
    bson::{Document, doc},
    options::{ClientOptions, ServerApi, ServerApiVersion},
};

use super::error::DriverError;
use super::models::{DeleteSummary, InsertSummary, UpdateSummary};

/// Endpoint and logical database name. Immutable once built.
#[derive(Clone)]
pub struct ConnectionConfig {
    url: String,
    database: String,
}

impl ConnectionConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

// The URL may carry credentials, keep it out of logs.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Produces a fresh connection for every call to [`connect`](Self::connect).
pub trait ConnectionFactory: Send + Sync {
    type Handle: ConnectionHandle;

    fn connect(&self) -> impl Future<Output = Result<Self::Handle, DriverError>> + Send;
}

/// A live connection owned by exactly one store operation.
pub trait ConnectionHandle: Send + Sync + Sized {
    /// Every document in `collection`, in whatever order the server returns.
    fn find_all(
        &self,
        collection: &str,
    ) -> impl Future<Output = Result<Vec<Document>, DriverError>> + Send;

    fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> impl Future<Output = Result<InsertSummary, DriverError>> + Send;

    fn delete_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> impl Future<Output = Result<DeleteSummary, DriverError>> + Send;

    /// Applies `update` as a `$set` patch to every match of `filter`.
    fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> impl Future<Output = Result<UpdateSummary, DriverError>> + Send;

    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Opens a new MongoDB client per connection, pinned to Stable API v1.
#[derive(Debug, Clone)]
pub struct MongoConnectionFactory {
    config: ConnectionConfig,
}

impl MongoConnectionFactory {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    async fn open(&self) -> Result<MongoHandle, mongodb::error::Error> {
        let mut options = ClientOptions::parse(self.config.url()).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;

        // The client connects lazily, ping so an unreachable server fails here.
        let ping = client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await;
        if let Err(e) = ping {
            client.shutdown().await;
            return Err(e);
        }

        let database = client.database(self.config.database());
        Ok(MongoHandle { database, client })
    }
}

impl ConnectionFactory for MongoConnectionFactory {
    type Handle = MongoHandle;

    async fn connect(&self) -> Result<MongoHandle, DriverError> {
        match self.open().await {
            Ok(handle) => {
                tracing::info!(database = %self.config.database(), "Connected to MongoDB");
                Ok(handle)
            }
            Err(e) => {
                tracing::warn!(database = %self.config.database(), "Failed to connect to MongoDB: {}", e);
                Err(e.into())
            }
        }
    }
}

pub struct MongoHandle {
    database: Database,
    client: Client,
}

impl MongoHandle {
    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

impl ConnectionHandle for MongoHandle {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, DriverError> {
        let mut cursor = self.collection(collection).find(doc! {}).await?;

        let mut documents = Vec::new();
        while cursor.advance().await? {
            documents.push(cursor.deserialize_current()?);
        }

        Ok(documents)
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<InsertSummary, DriverError> {
        let result = self.collection(collection).insert_many(documents).await?;
        Ok(InsertSummary::from_indexed(result.inserted_ids))
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteSummary, DriverError> {
        let result = self.collection(collection).delete_one(filter).await?;
        Ok(DeleteSummary {
            deleted_count: result.deleted_count,
        })
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, DriverError> {
        let result = self
            .collection(collection)
            .update_many(filter, doc! { "$set": update })
            .await?;

        Ok(UpdateSummary {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id,
        })
    }

    async fn close(self) {
        let Self { database, client } = self;
        tracing::debug!(database = %database.name(), "Closing MongoDB connection");
        drop(database);
        client.shutdown().await;
    }
}
