//! The `/callback` route: signature check, event decode, dispatch.

use {
    axum::{
        body::Bytes,
        extract::State,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
    },
    secrecy::ExposeSecret,
    std::sync::Arc,
    tracing::{debug, error, info, warn},
};

use pipesage_line::{InboundEvent, SIGNATURE_HEADER, WebhookPayload, inbound_events, signature};

use crate::state::AppState;

/// Reply sent for any text message.
pub const TEXT_PROMPT: &str =
    "Hello! Send a piping drawing as an image and I will analyze it for you.";

/// Reply sent as soon as an image arrives, before the analysis starts.
pub const ANALYSIS_ACK: &str =
    "Got your drawing. The expert system is analyzing it now; this usually takes 15 to 30 seconds.";

/// POST `/callback`.
///
/// Verifies the delivery signature over the raw body before any decoding,
/// then dispatches each event in order and only then acknowledges the
/// delivery.
pub async fn callback_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature_header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !signature::verify(state.channel_secret.expose_secret(), &body, signature_header) {
        warn!("rejecting delivery with missing or invalid signature");
        return (StatusCode::BAD_REQUEST, "invalid signature");
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "rejecting undecodable webhook body");
            return (StatusCode::BAD_REQUEST, "invalid body");
        },
    };

    for event in inbound_events(payload) {
        if let Err(e) = dispatch(&state, event).await {
            error!(error = %e, "event dispatch failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "dispatch failed");
        }
    }

    (StatusCode::OK, "OK")
}

/// Handle one event to completion.
///
/// The analysis round trip runs inside the request; a Dify failure surfaces
/// as the error message pushed to the user, not as a dispatch error.
async fn dispatch(state: &AppState, event: InboundEvent) -> pipesage_line::Result<()> {
    match event {
        InboundEvent::Text { reply_token, text } => {
            debug!(chars = text.len(), "answering text message with the usage prompt");
            state.line.reply(&reply_token, TEXT_PROMPT).await
        },
        InboundEvent::Image {
            reply_token,
            user_id,
            message_id,
        } => {
            info!(%message_id, "image received, starting analysis");
            state.line.reply(&reply_token, ANALYSIS_ACK).await?;
            let image = state.line.message_content(&message_id).await?;
            let verdict = state.dify.analyze(&user_id, image).await;
            state.line.push(&user_id, &verdict).await
        },
    }
}
