//! End-to-end scenarios
//!
//! Commands and gateway events go through the same entry points the
//! gateway uses; state is checked in the store and on the action channel.
//!
//! Run with: cargo test -p integration-tests

use integration_tests::*;
use tally_core::{
    EmojiRef, GuildRole, Permissions, PlatformAction, PlatformEvent, RoleTable, Snowflake,
    StaticMessageRepository, Tone,
};
use tally_service::services::{resolve, Acting, DenialReason, Outcome, Resolution, ResolveRequest};

/// Track 🔥 and bind an instant leaderboard to it; returns the board's message id
async fn tracked_with_board(engine: &mut Engine) -> Snowflake {
    let reply = engine
        .command(ADMIN, "/reaction/add", &[("emoji", FIRE), ("title", "Hot takes")])
        .await;
    assert_eq!(reply.description, "Tracking 🔥 for reactions.");

    let channel = BOARD_CHANNEL.to_string();
    let reply = engine
        .command(
            ADMIN,
            "/reaction/leaderboard/create",
            &[("channel", channel.as_str()), ("emoji", FIRE), ("update", "instant")],
        )
        .await;
    assert_eq!(reply.tone, Tone::Success, "{}", reply.description);

    let stored = StaticMessageRepository::list_by_guild(engine.store.as_ref(), GUILD)
        .await
        .expect("static messages load");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].channel_id, BOARD_CHANNEL);
    let board = stored[0].message_id;

    // Initial render and audit lines
    engine.actions();
    board
}

// ============================================================================
// Reaction scenarios
// ============================================================================

#[tokio::test]
async fn test_reaction_credits_author_and_renders_board() {
    let mut engine = Engine::new();
    let board = tracked_with_board(&mut engine).await;

    let outcomes = engine.deliver([reaction_added(REACTOR, MESSAGE, fire())]).await;
    assert_eq!(outcomes, vec![Outcome::Created]);

    let record = engine.record(MESSAGE, &fire()).await.expect("record created");
    assert_eq!(record.owner_id, AUTHOR);
    assert_eq!(record.count, 1);
    let entry = engine.entry(AUTHOR, &fire()).await.expect("entry created");
    assert_eq!(entry.count, 1);
    assert!(engine.entry(REACTOR, &fire()).await.is_none());

    let edits = engine.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].message_id, board);
    assert_eq!(edits[0].channel_id, BOARD_CHANNEL);
    let embed = &edits[0].body.embeds[0];
    assert_eq!(embed.title, "🔥 Hot takes");
    assert_eq!(embed.description, format!("1. <@{AUTHOR}> - 1"));
}

#[tokio::test]
async fn test_reaction_removal_empties_board() {
    let mut engine = Engine::new();
    let board = tracked_with_board(&mut engine).await;
    engine.deliver([reaction_added(REACTOR, MESSAGE, fire())]).await;
    engine.actions();

    let outcomes = engine.deliver([reaction_removed(REACTOR, MESSAGE, fire())]).await;
    assert_eq!(outcomes, vec![Outcome::Removed]);

    assert!(engine.record(MESSAGE, &fire()).await.is_none());
    assert!(engine.entry(AUTHOR, &fire()).await.is_none());

    let edits = engine.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].message_id, board);
    assert_eq!(edits[0].body.embeds[0].description, "No reactions tracked yet.");
}

#[tokio::test]
async fn test_count_tracks_accepted_adds_minus_removes() {
    let mut engine = Engine::new();
    engine
        .command(ADMIN, "/reaction/add", &[("emoji", FIRE), ("title", "Fire")])
        .await;

    let outcomes = engine
        .deliver([
            reaction_added(REACTOR, MESSAGE, fire()),
            reaction_added(SECOND_REACTOR, MESSAGE, fire()),
            reaction_added(OWNER, MESSAGE, fire()),
            reaction_removed(SECOND_REACTOR, MESSAGE, fire()),
        ])
        .await;
    assert_eq!(
        outcomes,
        vec![Outcome::Created, Outcome::Incremented, Outcome::Incremented, Outcome::Decremented]
    );
    assert_eq!(engine.record(MESSAGE, &fire()).await.map(|r| r.count), Some(2));
    assert_eq!(engine.entry(AUTHOR, &fire()).await.map(|e| e.count), Some(2));

    // Draining past zero never goes negative
    let outcomes = engine
        .deliver([
            reaction_removed(REACTOR, MESSAGE, fire()),
            reaction_removed(OWNER, MESSAGE, fire()),
            reaction_removed(SECOND_REACTOR, MESSAGE, fire()),
        ])
        .await;
    assert_eq!(outcomes, vec![Outcome::Decremented, Outcome::Removed, Outcome::Ignored]);
    assert!(engine.record(MESSAGE, &fire()).await.is_none());
    assert!(engine.entry(AUTHOR, &fire()).await.is_none());
}

#[tokio::test]
async fn test_self_reaction_never_counts() {
    let mut engine = Engine::new();
    engine
        .command(ADMIN, "/reaction/add", &[("emoji", FIRE), ("title", "Fire")])
        .await;

    let outcomes = engine
        .deliver([
            reaction_added(AUTHOR, MESSAGE, fire()),
            reaction_added(REACTOR, MESSAGE, fire()),
            reaction_added(AUTHOR, MESSAGE, fire()),
        ])
        .await;
    assert_eq!(outcomes, vec![Outcome::Ignored, Outcome::Created, Outcome::Ignored]);
    assert_eq!(engine.record(MESSAGE, &fire()).await.map(|r| r.count), Some(1));
}

#[tokio::test]
async fn test_untracked_emoji_leaves_no_trace() {
    let mut engine = Engine::new();
    engine
        .command(ADMIN, "/reaction/add", &[("emoji", FIRE), ("title", "Fire")])
        .await;
    engine.actions();

    let star = EmojiRef::unicode("⭐");
    let outcomes = engine.deliver([reaction_added(REACTOR, MESSAGE, star.clone())]).await;
    assert_eq!(outcomes, vec![Outcome::Ignored]);
    assert!(engine.record(MESSAGE, &star).await.is_none());
    assert!(engine.entry(AUTHOR, &star).await.is_none());
    assert!(engine.actions().is_empty());
}

#[tokio::test]
async fn test_bulk_removals_are_idempotent() {
    let mut engine = Engine::new();
    engine
        .command(ADMIN, "/reaction/add", &[("emoji", FIRE), ("title", "Fire")])
        .await;
    engine
        .deliver([
            reaction_added(REACTOR, MESSAGE, fire()),
            reaction_added(SECOND_REACTOR, MESSAGE, fire()),
            reaction_added(REACTOR, OTHER_MESSAGE, fire()),
        ])
        .await;
    assert_eq!(engine.entry(AUTHOR, &fire()).await.map(|e| e.count), Some(3));

    let outcomes = engine
        .deliver([emoji_cleared(MESSAGE, fire()), emoji_cleared(MESSAGE, fire())])
        .await;
    assert_eq!(outcomes, vec![Outcome::Cleared(1), Outcome::Cleared(0)]);
    assert!(engine.record(MESSAGE, &fire()).await.is_none());
    assert_eq!(engine.entry(AUTHOR, &fire()).await.map(|e| e.count), Some(1));

    let outcomes = engine
        .deliver([
            PlatformEvent::MessageDeleted(scope(OTHER_MESSAGE)),
            PlatformEvent::ReactionRemovedAll(scope(OTHER_MESSAGE)),
        ])
        .await;
    assert_eq!(outcomes, vec![Outcome::Cleared(1), Outcome::Cleared(0)]);
    assert!(engine.record(OTHER_MESSAGE, &fire()).await.is_none());
    assert!(engine.entry(AUTHOR, &fire()).await.is_none());
}

// ============================================================================
// Role toggle scenarios
// ============================================================================

#[tokio::test]
async fn test_threshold_denies_self_toggle_without_role_update() {
    let mut engine = Engine::new();
    let role = EVENTS_ROLE.to_string();
    let threshold = Permissions::MANAGE_MESSAGES.bits().to_string();

    let reply = engine
        .command(
            ADMIN,
            "/role/add",
            &[("role", role.as_str()), ("permissions", threshold.as_str())],
        )
        .await;
    assert_eq!(reply.description, format!("Added <@&{EVENTS_ROLE}> to the role toggles."));

    let reply = engine.command(REACTOR, "/toggle-role", &[("role", role.as_str())]).await;
    assert_eq!(reply.tone, Tone::Decline);
    assert_eq!(reply.description, DenialReason::MissingThreshold.message());
    assert!(!engine.platform.calls().iter().any(PlatformCall::is_role_update));

    // A member holding the permission through a role gets it
    let reply = engine
        .command(SECOND_REACTOR, "/toggle-role", &[("role", role.as_str())])
        .await;
    assert_eq!(reply.description, format!("Added <@&{EVENTS_ROLE}>."));
    assert_eq!(
        engine.platform.calls().into_iter().filter(PlatformCall::is_role_update).collect::<Vec<_>>(),
        vec![PlatformCall::AddRole(SECOND_REACTOR, EVENTS_ROLE)]
    );
    let member = engine.platform.member(SECOND_REACTOR).expect("member exists");
    assert!(member.has_role(EVENTS_ROLE));

    assert!(engine
        .actions()
        .iter()
        .any(|action| matches!(action, PlatformAction::LogEvent(_))));
}

#[tokio::test]
async fn test_role_list_follows_toggle_roster() {
    let mut engine = Engine::new();
    let channel = BOARD_CHANNEL.to_string();
    let reply = engine
        .command(ADMIN, "/role/message-create", &[("channel", channel.as_str())])
        .await;
    assert_eq!(reply.tone, Tone::Success, "{}", reply.description);
    engine.actions();

    let role = EVENTS_ROLE.to_string();
    engine
        .command(
            ADMIN,
            "/role/add",
            &[("role", role.as_str()), ("description", "Event pings")],
        )
        .await;
    let edits = engine.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].body.embeds[0].fields[0].value, format!("<@&{EVENTS_ROLE}> - Event pings"));

    let reply = engine.command(ADMIN, "/role/remove", &[("role", role.as_str())]).await;
    assert_eq!(reply.description, format!("Removed <@&{EVENTS_ROLE}> from the role toggles."));
    let edits = engine.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(
        edits[0].body.embeds[0].fields[0].value,
        "No self-assignable roles are configured."
    );
}

#[tokio::test]
async fn test_manager_cannot_configure_roles_above_them() {
    let engine = Engine::new();
    let role = BOT_ROLE.to_string();
    let reply = engine.command(ADMIN, "/role/add", &[("role", role.as_str())]).await;
    assert_eq!(reply.tone, Tone::Decline);
    assert_eq!(reply.description, DenialReason::AboveActor.message());

    let reply = engine.command(REACTOR, "/role/add", &[("role", EVENTS_ROLE.to_string().as_str())]).await;
    assert_eq!(reply.description, DenialReason::MissingManageRoles.message());
}

// ============================================================================
// Bot profile scenarios
// ============================================================================

#[tokio::test]
async fn test_only_administrators_change_the_bot_profile() {
    let engine = Engine::new();

    let reply = engine.command(ADMIN, "/bot/about", &[("text", "Counts reactions.")]).await;
    assert_eq!(reply.tone, Tone::Decline);
    assert_eq!(reply.description, "You need the Administrator permission.");
    assert!(engine.platform.calls().is_empty());

    let reply = engine.command(OWNER, "/bot/about", &[("text", "Counts reactions.")]).await;
    assert_eq!(reply.description, "Bot description updated.");
    assert_eq!(
        engine.platform.calls(),
        vec![PlatformCall::UpdateDescription("Counts reactions.".into())]
    );
}

#[tokio::test]
async fn test_unreachable_avatar_leaves_profile_alone() {
    let engine = Engine::new();
    let reply = engine
        .command(OWNER, "/bot/avatar", &[("url", "https://images.test/face.png")])
        .await;
    assert_eq!(reply.tone, Tone::Warn);
    assert_eq!(reply.description, "Image URL returned status 404.");
    assert!(engine.platform.calls().is_empty());
}

// ============================================================================
// Resolver properties
// ============================================================================

#[test]
fn test_resolver_properties_against_fixture_roles() {
    let table = RoleTable::new(GUILD, guild_roles());
    let target = |id| table.get(id).cloned().unwrap_or_else(|| panic!("role {id}"));
    let manager = |actor_roles: &[Snowflake], target: &GuildRole, is_owner| {
        resolve(&ResolveRequest {
            table: &table,
            actor_roles,
            target,
            acting: Acting::Manager { is_owner },
            threshold: Permissions::empty(),
        })
    };

    // No Manage Roles: denied whatever the positions
    let events = target(EVENTS_ROLE);
    assert_eq!(
        manager(&[HELPER_ROLE], &events, true),
        Resolution::Denied(DenialReason::MissingManageRoles)
    );

    // At or above the actor's top role
    let moderator = target(MOD_ROLE);
    assert_eq!(
        manager(&[MOD_ROLE], &moderator, false),
        Resolution::Denied(DenialReason::AboveActor)
    );
    assert_eq!(manager(&[MOD_ROLE], &moderator, true), Resolution::Allowed);
    assert_eq!(manager(&[MOD_ROLE], &events, false), Resolution::Allowed);

    // Administrator skips the position check
    let mut roles = guild_roles();
    roles.push(GuildRole::new(
        Snowflake::new(30),
        "admin",
        1,
        Permissions::ADMINISTRATOR,
    ));
    let table = RoleTable::new(GUILD, roles);
    let bot_role = table.get(BOT_ROLE).cloned().unwrap_or_else(|| panic!("bot role"));
    let decision = resolve(&ResolveRequest {
        table: &table,
        actor_roles: &[Snowflake::new(30)],
        target: &bot_role,
        acting: Acting::Manager { is_owner: false },
        threshold: Permissions::empty(),
    });
    assert!(decision.is_allowed());
}
