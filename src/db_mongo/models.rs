use std::collections::HashMap;

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSummary {
    pub inserted_count: usize,
    /// Generated or supplied `_id` values, in input order.
    pub inserted_ids: Vec<Bson>,
}

impl InsertSummary {
    /// The driver reports ids keyed by their position in the input batch.
    pub fn from_indexed(ids: HashMap<usize, Bson>) -> Self {
        let mut indexed: Vec<(usize, Bson)> = ids.into_iter().collect();
        indexed.sort_by_key(|(index, _)| *index);

        let inserted_ids: Vec<Bson> = indexed.into_iter().map(|(_, id)| id).collect();
        Self {
            inserted_count: inserted_ids.len(),
            inserted_ids,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<Bson>,
}

/// Filter and `$set` patch for an update.
///
/// A missing filter matches every document in the collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRequest {
    #[serde(default, alias = "searchData")]
    pub filter: Option<Document>,
    #[serde(alias = "updateData")]
    pub update: Document,
}

impl UpdateRequest {
    pub fn new(filter: Option<Document>, update: Document) -> Self {
        Self { filter, update }
    }

    /// Update without a filter. Touches the whole collection.
    pub fn all(update: Document) -> Self {
        Self::new(None, update)
    }
}
