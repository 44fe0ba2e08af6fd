//! Test fixtures: one guild with a small role hierarchy

use tally_core::{
    EmojiRef, GuildMember, GuildRole, MessageScope, Permissions, PlatformEvent, ReactionAddedEvent,
    ReactionRemovedEvent, ReactionRemovedForEmojiEvent, Snowflake,
};

pub const GUILD: Snowflake = Snowflake::new(700);
pub const CHANNEL: Snowflake = Snowflake::new(710);
pub const BOARD_CHANNEL: Snowflake = Snowflake::new(711);

// Users
pub const OWNER: Snowflake = Snowflake::new(1);
pub const BOT: Snowflake = Snowflake::new(2);
pub const ADMIN: Snowflake = Snowflake::new(3);
/// Reacting member ("A")
pub const REACTOR: Snowflake = Snowflake::new(4);
/// Author of [`MESSAGE`] ("B")
pub const AUTHOR: Snowflake = Snowflake::new(5);
pub const SECOND_REACTOR: Snowflake = Snowflake::new(6);

// Roles
pub const BOT_ROLE: Snowflake = Snowflake::new(20);
pub const MOD_ROLE: Snowflake = Snowflake::new(21);
pub const HELPER_ROLE: Snowflake = Snowflake::new(22);
pub const EVENTS_ROLE: Snowflake = Snowflake::new(23);

/// A message written by [`AUTHOR`]
pub const MESSAGE: Snowflake = Snowflake::new(800);
pub const OTHER_MESSAGE: Snowflake = Snowflake::new(801);

pub const FIRE: &str = "🔥";

/// Roles of [`GUILD`], lowest first
pub fn guild_roles() -> Vec<GuildRole> {
    vec![
        GuildRole::new(GUILD, "@everyone", 0, Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS),
        GuildRole::new(EVENTS_ROLE, "events", 2, Permissions::empty()),
        GuildRole::new(HELPER_ROLE, "helper", 3, Permissions::MANAGE_MESSAGES),
        GuildRole::new(MOD_ROLE, "mod", 5, Permissions::MANAGE_ROLES | Permissions::MANAGE_GUILD),
        GuildRole::new(BOT_ROLE, "tally", 6, Permissions::MANAGE_ROLES),
    ]
}

/// Members of [`GUILD`]
pub fn guild_members() -> Vec<GuildMember> {
    let mut bot = GuildMember::new(BOT, vec![BOT_ROLE]);
    bot.bot = true;
    vec![
        bot,
        GuildMember::new(OWNER, vec![]),
        GuildMember::new(ADMIN, vec![MOD_ROLE]),
        GuildMember::new(REACTOR, vec![]),
        GuildMember::new(AUTHOR, vec![]),
        GuildMember::new(SECOND_REACTOR, vec![HELPER_ROLE]),
    ]
}

pub fn fire() -> EmojiRef {
    EmojiRef::unicode(FIRE)
}

// ============================================================================
// Gateway events
// ============================================================================

pub fn reaction_added(user_id: Snowflake, message_id: Snowflake, emoji: EmojiRef) -> PlatformEvent {
    PlatformEvent::ReactionAdded(ReactionAddedEvent {
        guild_id: GUILD,
        channel_id: CHANNEL,
        message_id,
        user_id,
        author_id: AUTHOR,
        emoji,
        user_is_bot: false,
    })
}

pub fn reaction_removed(user_id: Snowflake, message_id: Snowflake, emoji: EmojiRef) -> PlatformEvent {
    PlatformEvent::ReactionRemoved(ReactionRemovedEvent {
        guild_id: GUILD,
        channel_id: CHANNEL,
        message_id,
        user_id,
        emoji,
    })
}

pub fn emoji_cleared(message_id: Snowflake, emoji: EmojiRef) -> PlatformEvent {
    PlatformEvent::ReactionRemovedForEmoji(ReactionRemovedForEmojiEvent {
        guild_id: GUILD,
        channel_id: CHANNEL,
        message_id,
        emoji,
    })
}

pub fn scope(message_id: Snowflake) -> MessageScope {
    MessageScope {
        guild_id: GUILD,
        channel_id: CHANNEL,
        message_id,
    }
}
