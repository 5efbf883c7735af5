use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson::Document;
use serde_json::json;

use crate::AppState;
use crate::db_mongo::{ConnectionFactory, StoreError};

/// Lists every project/component template in the configured collection.
pub async fn get_template<F>(
    State(state): State<AppState<F>>,
) -> Result<Json<Vec<Document>>, StoreError>
where
    F: ConnectionFactory + 'static,
{
    let templates = state.store.read_all(&state.template_collection).await?;
    tracing::debug!(
        collection = %state.template_collection,
        count = templates.len(),
        "Loaded templates"
    );
    Ok(Json(templates))
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);

        let status = match self {
            StoreError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::Operation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
