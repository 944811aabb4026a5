use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use folio_models::contact::ContactSubmission;
use serde_json::Value;
use tracing::warn;

use super::{error, internal_server_error, INTERNAL_SERVER_ERROR};
use crate::models::{ApiMessage, ApiValidationError};

pub const MESSAGE_SENT: &str = "Message sent successfully! I'll get back to you soon.";
pub const INVALID_FORM_DATA: &str = "Invalid form data";
pub const COULD_NOT_SEND_MESSAGE: &str =
    "Failed to send message. Please try again later or contact me directly via email.";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .with_state(service)
}

async fn send_message(service: State<Arc<impl ContactFeatureService>>, body: Bytes) -> Response {
    let record = match serde_json::from_slice(&body) {
        Ok(Value::Object(record)) => record,
        Ok(_) => return malformed_request(anyhow!("request body is not a json object")),
        Err(err) => return malformed_request(err),
    };

    let submission = match ContactSubmission::validate(&record) {
        Ok(submission) => submission,
        Err(issues) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiValidationError {
                    error: INVALID_FORM_DATA,
                    issues,
                }),
            )
                .into_response()
        }
    };

    match service.send_message(submission).await {
        Ok(()) => Json(ApiMessage {
            message: MESSAGE_SENT,
        })
        .into_response(),
        Err(ContactSendMessageError::Send) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, COULD_NOT_SEND_MESSAGE)
        }
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err),
    }
}

fn malformed_request(err: impl Into<anyhow::Error>) -> Response {
    warn!("malformed contact request: {}", err.into());
    error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
}
