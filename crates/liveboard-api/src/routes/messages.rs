//! Routes for the message context.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::delete, routing::get};
use liveboard_core::model::Message;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use liveboard_messages::application::{command_handlers, query_handlers};
use liveboard_messages::domain::commands;

use crate::error::ApiError;
use crate::routes::MutationResponse;
use crate::state::AppState;

/// Request body for POST /api/messages.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Display name of the sender.
    pub author: String,
    /// Message text.
    pub body: String,
}

/// Query parameters for GET /api/messages.
#[derive(Debug, Deserialize)]
pub struct ListMessagesParams {
    /// Maximum number of messages to return.
    pub limit: Option<usize>,
}

/// Response body for GET /api/messages.
#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    /// Messages, newest first.
    pub messages: Vec<Message>,
    /// Number of messages returned.
    pub count: usize,
}

/// POST /api/messages
#[instrument(skip(state, request))]
async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    let command = commands::SendMessage {
        correlation_id: Uuid::new_v4(),
        author: request.author,
        body: request.body,
    };

    info!(correlation_id = %command.correlation_id, "handling send_message command");

    let posted =
        command_handlers::handle_send_message(&command, state.clock.as_ref(), &*state.messages)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            id: posted.message.id,
            event_id: posted.event.id,
        }),
    ))
}

/// GET /api/messages
#[instrument(skip(state))]
async fn list_messages(
    State(state): State<AppState>,
    Query(params): Query<ListMessagesParams>,
) -> Result<Json<MessageListResponse>, ApiError> {
    let messages = query_handlers::list_messages(params.limit, &*state.messages).await?;

    Ok(Json(MessageListResponse {
        count: messages.len(),
        messages,
    }))
}

/// DELETE /api/messages/{id}
#[instrument(skip(state))]
async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<MutationResponse>, ApiError> {
    let command = commands::DeleteMessage {
        correlation_id: Uuid::new_v4(),
        message_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_message command");

    let stored =
        command_handlers::handle_delete_message(&command, state.clock.as_ref(), &*state.messages)
            .await?;

    Ok(Json(MutationResponse {
        id: message_id,
        event_id: stored.id,
    }))
}

/// Returns the router for the message context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/messages", get(list_messages).post(send_message))
        .route("/api/messages/{id}", delete(delete_message))
}
