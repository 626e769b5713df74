//! HTTP server for the hiscore roles bot.
//!
//! This module implements the HTTP server that:
//! - Accepts interactions from the chat platform, verifies their signatures,
//!   and answers them
//! - Provides a status endpoint for observability
//! - Provides health checks for liveness probes
//!
//! # Endpoints
//!
//! - `POST /interactions` - Interaction webhook (returns the interaction response)
//! - `GET /api/v1/status` - Sweep phase, snapshot and last sweep report as JSON
//! - `GET /health` - Returns 200 if server is running

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::bot::Bot;
use crate::effects::DiscordInterpreter;
use crate::hiscores::HiscoresFeed;
use crate::links::LinkStore;
use crate::webhooks::InteractionVerifier;

pub mod interactions;
pub mod status;

pub use interactions::{HEADER_SIGNATURE, HEADER_TIMESTAMP, InteractionError, interactions_handler};
pub use status::{BotStatus, health_handler, status_handler};

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor.
pub struct AppState<I, F, S> {
    inner: Arc<AppStateInner<I, F, S>>,
}

struct AppStateInner<I, F, S> {
    bot: Bot<I, F, S>,
    /// Checks interaction signatures against the application public key.
    verifier: InteractionVerifier,
}

impl<I, F, S> Clone for AppState<I, F, S> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I, F, S> AppState<I, F, S> {
    pub fn new(bot: Bot<I, F, S>, verifier: InteractionVerifier) -> Self {
        AppState {
            inner: Arc::new(AppStateInner { bot, verifier }),
        }
    }

    pub fn bot(&self) -> &Bot<I, F, S> {
        &self.inner.bot
    }

    pub fn verifier(&self) -> &InteractionVerifier {
        &self.inner.verifier
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<I, F, S>(app_state: AppState<I, F, S>) -> Router
where
    I: DiscordInterpreter + 'static,
    F: HiscoresFeed + 'static,
    S: LinkStore + 'static,
{
    Router::new()
        .route("/interactions", post(interactions_handler::<I, F, S>))
        .route("/api/v1/status", get(status_handler::<I, F, S>))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
