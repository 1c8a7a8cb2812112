//! Contact form endpoint

use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use serde_json::json;
use tracing::info;

use crate::{
    contact::{ContactMessage, ContactRequest},
    error::{AppError, Result},
    AppState,
};

pub const CONTACT_SUCCESS_MESSAGE: &str = "Mensaje enviado exitosamente";

pub async fn handle_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    // Parsed regardless of content type.
    let request: ContactRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::ContactBody(e.to_string()))?;

    let message = ContactMessage::parse(request)?;

    let outcome = state.contact.submit(message).await.map_err(|e| {
        state.metrics.record_delivery_failure();
        e
    })?;
    state.metrics.record_contact(outcome.confirmation_sent);

    info!(
        submission_id = %outcome.submission_id,
        confirmation_sent = outcome.confirmation_sent,
        "POST /api/contact - message relayed"
    );

    Ok(Json(json!({
        "success": true,
        "message": CONTACT_SUCCESS_MESSAGE,
    })))
}
