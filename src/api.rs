//! HTTP routes for crane-mailbox.

use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::messages::NewMessage;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Builds the application router around a shared database handle.
pub fn router(db: Database) -> Router {
    Router::new()
        .route("/send_message/", post(send_message))
        .route("/send_message", post(send_message))
        .route("/messages/{crane_id}", get(get_messages))
        .route("/mark_as_read/{message_id}", put(mark_as_read))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        // Message text has no length limit.
        .layer(DefaultBodyLimit::disable())
        .with_state(db)
}

/// Send a message from one crane to another.
async fn send_message(
    State(db): State<Database>,
    payload: Result<Json<NewMessage>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(new) = payload?;

    let message_id = db.insert_message(&new)?;
    tracing::info!(
        %message_id,
        sender_id = %new.sender_id,
        receiver_id = %new.receiver_id,
        "Message sent"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Message sent", "message_id": message_id })),
    ))
}

/// Retrieve every message addressed to a crane.
async fn get_messages(
    State(db): State<Database>,
    Path(crane_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let messages = db.messages_for_receiver(&crane_id)?;
    tracing::debug!(%crane_id, count = messages.len(), "Fetched inbox");
    Ok(Json(json!({ "messages": messages })))
}

/// Mark a message as read.
///
/// An already-read message is reported as not found, same as an unknown id.
async fn mark_as_read(
    State(db): State<Database>,
    Path(message_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = Uuid::parse_str(&message_id).map_err(|_| ApiError::InvalidMessageId(message_id))?;

    if !db.mark_read(&id)? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(message_id = %id, "Message marked as read");

    Ok(Json(json!({ "message": "Message marked as read" })))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
