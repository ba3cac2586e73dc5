//! Storage command routes.

use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{error, warn};
use tweak_core::{CommandArgs, TweakError};
use tweak_types::StorageReply;

/// GET /storage/{command} - Apply one storage command.
///
/// The query string is decoded by the interpreter rather than an extractor,
/// so encoding errors and repeated arguments are reported like any other
/// malformed request. Domain faults are 200 responses whose body reports
/// the `Error` state.
pub async fn command(
    State(state): State<Arc<AppState>>,
    Path(command): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<StorageReply>, (StatusCode, String)> {
    CommandArgs::from_query(query.as_deref())
        .and_then(|args| state.storage.execute(&command, args))
        .map(Json)
        .map_err(|e| {
            let status = status_for(&e);
            if status.is_server_error() {
                error!(target: "tweak::api", "Storage command '{}' failed: {}", command, e);
            } else {
                warn!(target: "tweak::api", "Rejected storage command '{}': {}", command, e);
            }
            (status, e.to_string())
        })
}

/// HTTP status for a request-level failure.
pub fn status_for(err: &TweakError) -> StatusCode {
    match err {
        TweakError::UnknownCommand(_) => StatusCode::NOT_FOUND,
        e if e.is_malformed_request() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
