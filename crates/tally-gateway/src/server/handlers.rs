//! Ingress handlers

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use tally_common::AppError;
use tally_core::{InteractionReceivedEvent, PlatformEvent};
use tally_service::{CommandInvocation, CommandReply};

use crate::ingress::Accepted;

use super::error::ApiResult;
use super::state::AppState;

/// Liveness response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Result of `POST /events`
#[derive(Debug, Clone, Serialize)]
pub struct EventAck {
    pub event_type: &'static str,
    pub published: bool,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

/// POST /events
///
/// Publishes a platform event and returns before it is processed.
pub async fn post_event(
    State(state): State<AppState>,
    payload: Result<Json<PlatformEvent>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EventAck>)> {
    let Json(event) = payload?;
    let event_type = event.event_type();
    let accepted = state.ingress().accept(event).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(EventAck {
            event_type,
            published: accepted == Accepted::Published,
        }),
    ))
}

/// POST /interactions
///
/// Answers a slash command with the reply to show the caller.
pub async fn post_interaction(
    State(state): State<AppState>,
    payload: Result<Json<CommandInvocation>, JsonRejection>,
) -> ApiResult<Json<CommandReply>> {
    let Json(invocation) = payload?;
    if !state.ingress().serves(invocation.guild_id) {
        return Err(AppError::GuildNotServed.into());
    }

    state
        .ingress()
        .accept(PlatformEvent::InteractionReceived(InteractionReceivedEvent {
            guild_id: invocation.guild_id,
            user_id: invocation.user_id,
            command: invocation.command.clone(),
        }))
        .await?;

    let reply = state.commands().dispatch(invocation).await;
    debug!(tone = ?reply.tone, "Command answered");
    Ok(Json(reply))
}
