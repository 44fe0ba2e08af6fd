//! Bot profile service
//!
//! Name, avatar, banner and about text of the bot account. These are
//! global to the bot, so every change requires the Administrator
//! permission (or guild ownership) in the invoking guild.

use tracing::{error, info, instrument, warn};

use tally_core::{
    LogEventAction, LogLevel, Permissions, PlatformError, ProfileImage, ProfileUpdate,
    RoleHierarchyState, Snowflake,
};

use crate::dto::{BotAboutRequest, BotImageRequest, BotNameRequest, CommandReply};
use crate::lookup::ActorContext;

use super::context::ServiceContext;

const ROLES_UNVERIFIED: &str = "Server roles could not be verified right now. Try again shortly.";

/// Which profile image a command replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSlot {
    Avatar,
    Banner,
}

impl ProfileSlot {
    fn label(self) -> &'static str {
        match self {
            Self::Avatar => "avatar",
            Self::Banner => "banner",
        }
    }
}

/// Bot profile service
pub struct BotProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BotProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// `/bot/name`
    #[instrument(skip(self, request))]
    pub async fn rename(&self, guild_id: Snowflake, user_id: Snowflake, request: BotNameRequest) -> CommandReply {
        if let Err(reply) = self.authorize(guild_id, user_id).await {
            return reply;
        }

        let update = ProfileUpdate {
            username: Some(request.name.clone()),
            ..ProfileUpdate::default()
        };
        if let Err(e) = self.ctx.platform().update_current_user(&update).await {
            error!(error = %e, "Failed to update bot name");
            return CommandReply::error("Failed to update bot name.");
        }

        info!(guild_id = %guild_id, name = %request.name, "Bot renamed");
        self.changed(guild_id, user_id, "Bot name updated", Some(request.name)).await;
        CommandReply::success("Bot name updated.")
    }

    /// `/bot/avatar` and `/bot/banner`
    #[instrument(skip(self, request))]
    pub async fn set_image(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        slot: ProfileSlot,
        request: BotImageRequest,
    ) -> CommandReply {
        let url = match request.source() {
            Ok(url) => url,
            Err(message) => return CommandReply::warn(message),
        };
        if let Err(reply) = self.authorize(guild_id, user_id).await {
            return reply;
        }

        let image = match self.download(url, request.attachment_content_type.as_deref()).await {
            Ok(image) => image,
            Err(reply) => return reply,
        };

        let label = slot.label();
        let update = match slot {
            ProfileSlot::Avatar => ProfileUpdate {
                avatar: Some(image),
                ..ProfileUpdate::default()
            },
            ProfileSlot::Banner => ProfileUpdate {
                banner: Some(image),
                ..ProfileUpdate::default()
            },
        };
        if let Err(e) = self.ctx.platform().update_current_user(&update).await {
            error!(slot = label, error = %e, "Failed to update bot image");
            return CommandReply::error(format!("Failed to update bot {label}."));
        }

        info!(guild_id = %guild_id, slot = label, "Bot image updated");
        self.changed(guild_id, user_id, &format!("Bot {label} updated"), None).await;
        CommandReply::success(format!("Bot {label} updated."))
    }

    /// `/bot/about`
    #[instrument(skip(self, request))]
    pub async fn set_about(&self, guild_id: Snowflake, user_id: Snowflake, request: BotAboutRequest) -> CommandReply {
        if let Err(reply) = self.authorize(guild_id, user_id).await {
            return reply;
        }

        if let Err(e) = self.ctx.platform().update_application_description(&request.text).await {
            error!(error = %e, "Failed to update bot description");
            return CommandReply::error("Failed to update bot description.");
        }

        info!(guild_id = %guild_id, "Bot description updated");
        self.changed(guild_id, user_id, "Bot description updated", None).await;
        CommandReply::success("Bot description updated.")
    }

    /// Administrator or owner; a failed lookup is never a denial
    async fn authorize(&self, guild_id: Snowflake, user_id: Snowflake) -> Result<(), CommandReply> {
        let lookup = self.ctx.role_lookup();
        let owner = lookup.guild_owner(guild_id).await.map_err(|e| {
            warn!(guild_id = %guild_id, error = %e, "Unable to resolve guild owner");
            CommandReply::warn(ROLES_UNVERIFIED)
        })?;
        if owner == user_id {
            return Ok(());
        }

        let ActorContext { member, table } = lookup.actor(guild_id, user_id, &[]).await.map_err(|e| {
            warn!(guild_id = %guild_id, user_id = %user_id, error = %e, "Unable to resolve member roles");
            CommandReply::warn(ROLES_UNVERIFIED)
        })?;
        let state = RoleHierarchyState::for_member(&member, &table);
        if state.permissions.contains(Permissions::ADMINISTRATOR) {
            Ok(())
        } else {
            Err(CommandReply::decline("You need the Administrator permission."))
        }
    }

    async fn download(&self, url: &str, declared: Option<&str>) -> Result<ProfileImage, CommandReply> {
        let fetched = match self.ctx.platform().fetch_image(url).await {
            Ok(fetched) => fetched,
            Err(PlatformError::Status(status)) => {
                return Err(CommandReply::warn(format!("Image URL returned status {status}.")));
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch image");
                return Err(CommandReply::warn("Failed to fetch image."));
            }
        };
        if fetched.data.is_empty() {
            return Err(CommandReply::warn("Failed to read image data."));
        }

        ProfileImage::detect(fetched.data, declared, fetched.content_type.as_deref(), url)
            .ok_or_else(|| CommandReply::warn("Image must be PNG, JPEG, WEBP, or GIF."))
    }

    async fn changed(&self, guild_id: Snowflake, user_id: Snowflake, title: &str, value: Option<String>) {
        let mut log = LogEventAction::new("bot", LogLevel::Info, title)
            .with_guild(guild_id)
            .with_field("by", format!("<@{user_id}>"));
        if let Some(value) = value {
            log = log.with_field("value", value);
        }
        self.ctx.audit(log).await;
    }
}
