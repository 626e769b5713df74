//! Liveness and status endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::effects::DiscordInterpreter;
use crate::hiscores::HiscoresFeed;
use crate::links::{LinkStore, StoreError};
use crate::reconcile::{SweepPhase, SweepReport};

/// Returns 200 OK with the text "OK" while the server is accepting
/// connections.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Body of `GET /api/v1/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStatus {
    pub phase: SweepPhase,
    /// Entries in the current leaderboard snapshot.
    pub snapshot_entries: usize,
    /// `None` until the first successful refresh.
    pub snapshot_fetched_at: Option<DateTime<Utc>>,
    pub linked_users: usize,
    pub last_report: Option<SweepReport>,
}

pub struct StatusError(StoreError);

impl IntoResponse for StatusError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

/// Reports the sweep phase, the current snapshot and the last sweep.
///
/// # Example
///
/// ```ignore
/// GET /api/v1/status HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: application/json
///
/// {"phase": "idle", "snapshot_entries": 250, ...}
/// ```
pub async fn status_handler<I, F, S>(
    State(app_state): State<AppState<I, F, S>>,
) -> Result<Json<BotStatus>, StatusError>
where
    I: DiscordInterpreter + 'static,
    F: HiscoresFeed + 'static,
    S: LinkStore + 'static,
{
    let sweep = app_state.bot().sweep();
    let snapshot = sweep.hiscores().current();
    let linked_users = sweep.registry().list_all().map_err(StatusError)?.len();

    Ok(Json(BotStatus {
        phase: sweep.phase(),
        snapshot_entries: snapshot.len(),
        snapshot_fetched_at: snapshot.fetched_at(),
        linked_users,
        last_report: sweep.last_report(),
    }))
}
