//! Request handlers for search and reload.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info, warn};

use keybridge_vault::hierarchy::{FIELD_TITLE, FIELD_URL, FIELD_USERNAME};
use keybridge_vault::Criteria;

use crate::response::{ApiError, EntryResponse, StatusResponse};
use crate::state::AppState;

/// Query parameters accepted by `GET /search`.
///
/// Each maps onto one recognized criteria field; the password field is
/// never a search key.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub username: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl SearchParams {
    /// Build the criteria mapping, ignoring absent and empty parameters.
    fn into_fields(self) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        let pairs = [
            (FIELD_USERNAME, self.username),
            (FIELD_TITLE, self.title),
            (FIELD_URL, self.url),
        ];
        for (name, value) in pairs {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                fields.insert(name.to_string(), value);
            }
        }
        fields
    }
}

/// `GET /search`: find the first entry matching the given fields.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<EntryResponse>, ApiError> {
    let criteria = Criteria::new(params.into_fields())?;
    debug!(fields = criteria.len(), "Searching vault");

    let entry = state.store.search(&criteria)?;
    Ok(Json(EntryResponse::from_entry(&entry)))
}

/// Form body accepted by `POST /reload`.
#[derive(Debug, Deserialize)]
pub struct ReloadParams {
    pub password: String,
}

/// `POST /reload`: decode the configured container and swap it in.
///
/// The decode (file I/O plus key derivation) runs on the blocking pool so
/// concurrent searches stay responsive for its whole duration.
pub async fn reload(
    State(state): State<Arc<AppState>>,
    Form(params): Form<ReloadParams>,
) -> Result<Json<StatusResponse>, ApiError> {
    let task_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        task_state
            .store
            .load(&task_state.vault_path, &params.password)
    })
    .await
    .map_err(|e| ApiError::internal(format!("reload task failed: {}", e)))?;

    if let Err(err) = result {
        warn!(error = %err, "Vault reload failed");
        return Err(err.into());
    }

    let snapshot = state.store.snapshot();
    info!(
        groups = snapshot.group_count(),
        entries = snapshot.entry_count(),
        "Vault reloaded"
    );

    Ok(Json(StatusResponse::success()))
}
