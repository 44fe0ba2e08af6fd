//! Platform stub shared by the gateway's unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use tally_core::{
    FetchedImage, GuildInfo, GuildMember, GuildRole, MessageBody, Platform, PlatformError,
    PlatformResult, ProfileUpdate, Snowflake,
};

/// Author returned by [`StubPlatform::message_author`]
pub const AUTHOR: Snowflake = Snowflake::new(4);
/// Message id whose author lookup fails
pub const UNKNOWN_MESSAGE: Snowflake = Snowflake::new(404);

#[derive(Debug, Default)]
pub struct StubPlatform {
    pub members: Mutex<HashMap<Snowflake, GuildMember>>,
}

impl StubPlatform {
    pub fn with_member(self, member: GuildMember) -> Self {
        self.members.lock().unwrap().insert(member.user_id, member);
        self
    }
}

#[async_trait]
impl Platform for StubPlatform {
    async fn create_message(&self, _: Snowflake, _: &MessageBody) -> PlatformResult<Snowflake> {
        Ok(Snowflake::new(1))
    }

    async fn edit_message(&self, _: Snowflake, _: Snowflake, _: &MessageBody) -> PlatformResult<()> {
        Ok(())
    }

    async fn delete_message(&self, _: Snowflake, _: Snowflake) -> PlatformResult<()> {
        Ok(())
    }

    async fn message_author(&self, _: Snowflake, message_id: Snowflake) -> PlatformResult<Snowflake> {
        if message_id == UNKNOWN_MESSAGE {
            return Err(PlatformError::NotFound("message".into()));
        }
        Ok(AUTHOR)
    }

    async fn get_roles(&self, _: Snowflake) -> PlatformResult<Vec<GuildRole>> {
        Ok(Vec::new())
    }

    async fn get_member(&self, _: Snowflake, user_id: Snowflake) -> PlatformResult<GuildMember> {
        self.members
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound("member".into()))
    }

    async fn get_guild(&self, guild_id: Snowflake) -> PlatformResult<GuildInfo> {
        Ok(GuildInfo {
            id: guild_id,
            owner_id: Snowflake::new(1),
        })
    }

    async fn get_emoji(&self, _: Snowflake, _: Snowflake) -> PlatformResult<()> {
        Ok(())
    }

    async fn add_member_role(&self, _: Snowflake, _: Snowflake, _: Snowflake) -> PlatformResult<()> {
        Ok(())
    }

    async fn remove_member_role(&self, _: Snowflake, _: Snowflake, _: Snowflake) -> PlatformResult<()> {
        Ok(())
    }

    async fn fetch_image(&self, _: &str) -> PlatformResult<FetchedImage> {
        Err(PlatformError::Status(404))
    }

    async fn update_current_user(&self, _: &ProfileUpdate) -> PlatformResult<()> {
        Ok(())
    }

    async fn update_application_description(&self, _: &str) -> PlatformResult<()> {
        Ok(())
    }
}
