//! Interaction endpoint handler.
//!
//! Verifies the request signature, parses the interaction and answers it
//! synchronously. Slow work (API calls, sweeps) is spawned as a followup
//! after the response is chosen.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, warn};

use super::AppState;
use crate::bot::InteractionResponse;
use crate::effects::DiscordInterpreter;
use crate::hiscores::HiscoresFeed;
use crate::links::LinkStore;
use crate::webhooks::{ParseError, parse_interaction};

/// Header carrying the hex Ed25519 signature.
pub const HEADER_SIGNATURE: &str = "x-signature-ed25519";
/// Header carrying the signed timestamp.
pub const HEADER_TIMESTAMP: &str = "x-signature-timestamp";

/// Errors that can occur when receiving an interaction.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("invalid request signature")]
    InvalidSignature,

    #[error("invalid interaction payload: {0}")]
    Parse(#[from] ParseError),

    #[error("unsupported interaction type")]
    UnsupportedType,
}

impl IntoResponse for InteractionError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Unsigned requests are rejected the same way as badly signed ones.
            InteractionError::MissingHeader(_) | InteractionError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            InteractionError::Parse(_) | InteractionError::UnsupportedType => {
                StatusCode::BAD_REQUEST
            }
        };
        (status, self.to_string()).into_response()
    }
}

/// Interaction handler.
///
/// # Request
///
/// - Method: POST
/// - Required headers: `X-Signature-Ed25519`, `X-Signature-Timestamp`
/// - Body: interaction JSON
///
/// # Response
///
/// - 200 OK with the interaction response JSON
/// - 400 Bad Request: malformed or unsupported interaction
/// - 401 Unauthorized: missing or invalid signature
pub async fn interactions_handler<I, F, S>(
    State(app_state): State<AppState<I, F, S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionResponse>, InteractionError>
where
    I: DiscordInterpreter + 'static,
    F: HiscoresFeed + 'static,
    S: LinkStore + 'static,
{
    let signature = get_header(&headers, HEADER_SIGNATURE)?;
    let timestamp = get_header(&headers, HEADER_TIMESTAMP)?;

    // Nothing is parsed before the signature checks out.
    if let Err(e) = app_state.verifier().verify(timestamp, &body, signature) {
        warn!(error = %e, "Rejected interaction");
        return Err(InteractionError::InvalidSignature);
    }

    let interaction = parse_interaction(&body)?.ok_or(InteractionError::UnsupportedType)?;
    debug!(kind = interaction.kind(), "Received interaction");

    let handled = app_state.bot().handle_interaction(&interaction);
    if let Some(followup) = handled.followup {
        let bot = app_state.bot().clone();
        tokio::spawn(async move { bot.run_followup(followup).await });
    }

    Ok(Json(handled.response))
}

fn get_header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, InteractionError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(InteractionError::MissingHeader(name))
}
