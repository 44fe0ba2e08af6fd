//! Gateway-to-platform flow with the consumer tasks running
//!
//! Run with: cargo test -p integration-tests

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use integration_tests::*;
use tally_core::Tone;

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}

#[tokio::test]
async fn test_http_event_reaches_the_store() {
    let mut engine = Engine::new();
    engine
        .command(ADMIN, "/reaction/add", &[("emoji", FIRE), ("title", "Fire")])
        .await;

    // Author omitted: the ingress resolves it from the platform
    let event = json!({
        "type": "MESSAGE_REACTION_ADD",
        "data": {
            "guild_id": GUILD.to_string(),
            "channel_id": CHANNEL.to_string(),
            "message_id": MESSAGE.to_string(),
            "user_id": REACTOR.to_string(),
            "emoji": { "name": FIRE }
        }
    });
    let response = engine.app().oneshot(post("/events", &event)).await.expect("served");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(json_body(response).await["published"], true);

    engine.settle().await;
    let record = engine.record(MESSAGE, &fire()).await.expect("record created");
    assert_eq!(record.owner_id, AUTHOR);
    assert_eq!(engine.entry(AUTHOR, &fire()).await.map(|e| e.count), Some(1));
}

#[tokio::test]
async fn test_http_interaction_runs_command() {
    let engine = Engine::new();
    let invocation = json!({
        "guild_id": GUILD.to_string(),
        "user_id": ADMIN.to_string(),
        "command": "/reaction/add",
        "options": { "emoji": FIRE, "title": "Fire" }
    });
    let response = engine
        .app()
        .oneshot(post("/interactions", &invocation))
        .await
        .expect("served");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["description"], "Tracking 🔥 for reactions.");

    let reply = engine.command(ADMIN, "/reaction/list", &[]).await;
    assert_eq!(reply.tone, Tone::Info);
    assert!(reply.description.contains(FIRE), "{}", reply.description);
}

#[tokio::test]
async fn test_running_engine_edits_board_on_platform() -> anyhow::Result<()> {
    let engine = Engine::new();
    engine
        .command(ADMIN, "/reaction/add", &[("emoji", FIRE), ("title", "Fire")])
        .await;
    let channel = BOARD_CHANNEL.to_string();
    let reply = engine
        .command(
            ADMIN,
            "/reaction/leaderboard/create",
            &[("channel", channel.as_str()), ("emoji", FIRE), ("update", "instant")],
        )
        .await;
    assert_eq!(reply.tone, Tone::Success, "{}", reply.description);

    let running = engine.spawn();
    // Initial render of the fresh board
    running.wait_for(|platform| platform.edits().len() == 1).await?;

    running.publish(reaction_added(REACTOR, MESSAGE, fire())).await?;
    running.wait_for(|platform| platform.edits().len() == 2).await?;

    let edits = running.platform.edits();
    let (_, body) = &edits[1];
    assert_eq!(body.embeds[0].description, format!("1. <@{AUTHOR}> - 1"));

    running.publish(reaction_removed(REACTOR, MESSAGE, fire())).await?;
    running.wait_for(|platform| platform.edits().len() == 3).await?;
    let edits = running.platform.edits();
    assert_eq!(edits[2].1.embeds[0].description, "No reactions tracked yet.");

    running.stop().await
}
