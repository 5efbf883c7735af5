pub mod config;
pub mod db_mongo;
pub mod health;
pub mod template;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db_mongo::{ConnectionFactory, DocumentStore, MongoConnectionFactory};

pub struct AppState<F = MongoConnectionFactory> {
    pub store: Arc<DocumentStore<F>>,
    pub template_collection: Arc<str>,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            template_collection: self.template_collection.clone(),
        }
    }
}

impl<F: ConnectionFactory> AppState<F> {
    pub fn new(store: DocumentStore<F>, template_collection: impl Into<Arc<str>>) -> Self {
        Self {
            store: Arc::new(store),
            template_collection: template_collection.into(),
        }
    }
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DocumentStore::mongo(config.connection()),
            config.template_collection.as_str(),
        )
    }
}

pub fn app<F>(state: AppState<F>) -> Router
where
    F: ConnectionFactory + 'static,
{
    Router::new()
        .route("/health", get(health::health_check))
        .route("/project/template", get(template::get_template::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
