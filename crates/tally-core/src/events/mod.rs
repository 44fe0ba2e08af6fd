//! Bus payloads: inbound platform events and outbound actions

mod action;
mod message_body;
mod platform_event;

pub use action::{
    EditMessageAction, LogEventAction, LogField, LogLevel, PlatformAction, SendMessageAction,
};
pub use message_body::{Embed, EmbedField, MessageBody, Tone};
pub use platform_event::{
    InteractionReceivedEvent, MessageScope, PlatformEvent, ReactionAddedEvent,
    ReactionRemovedEvent, ReactionRemovedForEmojiEvent,
};
