//! In-memory [`ConnectionFactory`] for tests.
//!
//! Collections live behind a shared mutex, filters match on top-level field
//! equality and updates follow `$set` semantics. The factory counts opened
//! and closed handles and can be switched into failing connects or failing
//! operations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mongodb::bson::{Bson, Document, oid::ObjectId};

use super::connection::{ConnectionFactory, ConnectionHandle};
use super::error::DriverError;
use super::models::{DeleteSummary, InsertSummary, UpdateSummary};

type Collections = HashMap<String, Vec<Document>>;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MemoryError(String);

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    closed: AtomicUsize,
    operations: AtomicUsize,
    fail_connects: AtomicBool,
    fail_operations: AtomicBool,
}

#[derive(Clone, Default)]
pub struct MemoryConnectionFactory {
    collections: Arc<Mutex<Collections>>,
    counters: Arc<Counters>,
}

impl MemoryConnectionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, collection: &str, documents: Vec<Document>) {
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    pub fn fail_connects(&self, fail: bool) {
        self.counters.fail_connects.store(fail, Ordering::SeqCst);
    }

    pub fn fail_operations(&self, fail: bool) {
        self.counters.fail_operations.store(fail, Ordering::SeqCst);
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    /// Operations that reached a handle, successful or not.
    pub fn operations(&self) -> usize {
        self.counters.operations.load(Ordering::SeqCst)
    }
}

impl ConnectionFactory for MemoryConnectionFactory {
    type Handle = MemoryHandle;

    async fn connect(&self) -> Result<MemoryHandle, DriverError> {
        if self.counters.fail_connects.load(Ordering::SeqCst) {
            return Err(Box::new(MemoryError("connection refused".to_string())));
        }

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryHandle {
            collections: self.collections.clone(),
            counters: self.counters.clone(),
        })
    }
}

pub struct MemoryHandle {
    collections: Arc<Mutex<Collections>>,
    counters: Arc<Counters>,
}

impl MemoryHandle {
    fn begin(&self, operation: &str) -> Result<(), DriverError> {
        self.counters.operations.fetch_add(1, Ordering::SeqCst);
        if self.counters.fail_operations.load(Ordering::SeqCst) {
            return Err(Box::new(MemoryError(format!("{operation} failed"))));
        }
        Ok(())
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

impl ConnectionHandle for MemoryHandle {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, DriverError> {
        self.begin("find")?;
        let collections = self.collections.lock().unwrap();
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<InsertSummary, DriverError> {
        self.begin("insert")?;
        if documents.is_empty() {
            return Err(Box::new(MemoryError(
                "insert requires at least one document".to_string(),
            )));
        }

        let mut collections = self.collections.lock().unwrap();
        let target = collections.entry(collection.to_string()).or_default();

        let mut ids = HashMap::new();
        for (index, mut document) in documents.into_iter().enumerate() {
            let id = match document.get("_id") {
                Some(id) => id.clone(),
                None => {
                    let id = Bson::ObjectId(ObjectId::new());
                    document.insert("_id", id.clone());
                    id
                }
            };
            ids.insert(index, id);
            target.push(document);
        }

        Ok(InsertSummary::from_indexed(ids))
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteSummary, DriverError> {
        self.begin("delete")?;
        let mut collections = self.collections.lock().unwrap();

        let deleted_count = match collections.get_mut(collection) {
            Some(documents) => match documents.iter().position(|d| matches(d, &filter)) {
                Some(index) => {
                    documents.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteSummary { deleted_count })
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, DriverError> {
        self.begin("update")?;
        let mut collections = self.collections.lock().unwrap();

        let mut matched_count = 0;
        let mut modified_count = 0;
        if let Some(documents) = collections.get_mut(collection) {
            for document in documents.iter_mut().filter(|d| matches(d, &filter)) {
                matched_count += 1;
                let mut modified = false;
                for (key, value) in &update {
                    if document.get(key) != Some(value) {
                        document.insert(key.clone(), value.clone());
                        modified = true;
                    }
                }
                if modified {
                    modified_count += 1;
                }
            }
        }

        Ok(UpdateSummary {
            matched_count,
            modified_count,
            upserted_id: None,
        })
    }

    async fn close(self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}
