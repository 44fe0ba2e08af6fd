//! Role toggle service
//!
//! Administrators choose which roles members may toggle on themselves;
//! members toggle or list them. Every role change passes the hierarchy
//! resolver twice: once for the human, once for the bot that applies it.

use tracing::{error, info, instrument, warn};

use tally_core::{
    GuildMember, GuildRole, LogEventAction, LogLevel, Permissions, RoleHierarchyState, RoleTable,
    RoleToggle, Snowflake, Tone,
};

use crate::dto::{CommandReply, RoleToggleRequest};
use crate::lookup::ActorContext;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::resolver::{resolve, Acting, DenialReason, ResolveRequest, Resolution};
use super::synchronizer::StaticMessageSynchronizer;

const MISSING_MEMBER: &str = "Missing member data.";
const ROLES_UNVERIFIED: &str = "Server roles could not be verified right now. Try again shortly.";

/// Actor, bot and a role table covering both plus the referenced roles
struct Participants {
    member: GuildMember,
    bot: GuildMember,
    table: RoleTable,
}

/// Role toggle service
pub struct RoleToggleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoleToggleService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// `/role/add`: create or update a toggle
    #[instrument(skip(self, request), fields(role_id = %request.role_id))]
    pub async fn add(&self, guild_id: Snowflake, user_id: Snowflake, request: RoleToggleRequest) -> CommandReply {
        let permissions = match Permissions::parse(request.permissions.as_deref().unwrap_or_default()) {
            Ok(permissions) => permissions,
            Err(_) => return CommandReply::warn("Permissions must be a whole number."),
        };
        let role_id = request.role_id;
        if let Err(reply) = self.authorize_manager(guild_id, user_id, role_id).await {
            return reply;
        }

        let toggle = RoleToggle::new(guild_id, role_id, permissions, request.description);
        let created = match self.ctx.toggle_repo().upsert(&toggle).await {
            Ok(created) => created,
            Err(e) => {
                error!(guild_id = %guild_id, error = %e, "Failed to save role toggle");
                return CommandReply::error("Failed to save role toggle.");
            }
        };

        info!(guild_id = %guild_id, role_id = %role_id, created, "Role toggle saved");
        self.roster_changed(guild_id, user_id, role_id, "Role toggle saved").await;

        if created {
            CommandReply::success(format!("Added <@&{role_id}> to the role toggles."))
        } else {
            CommandReply::success(format!("Updated <@&{role_id}> in the role toggles."))
        }
    }

    /// `/role/remove`: delete a toggle
    #[instrument(skip(self))]
    pub async fn remove(&self, guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> CommandReply {
        if let Err(reply) = self.authorize_manager(guild_id, user_id, role_id).await {
            return reply;
        }

        match self.ctx.toggle_repo().delete(guild_id, role_id).await {
            Ok(false) => CommandReply::info(format!("<@&{role_id}> was not in the role toggles.")),
            Ok(true) => {
                info!(guild_id = %guild_id, role_id = %role_id, "Role toggle removed");
                self.roster_changed(guild_id, user_id, role_id, "Role toggle removed").await;
                CommandReply::success(format!("Removed <@&{role_id}> from the role toggles."))
            }
            Err(e) => {
                error!(guild_id = %guild_id, error = %e, "Failed to remove role toggle");
                CommandReply::error("Failed to remove role toggle.")
            }
        }
    }

    /// `/toggle-role`: toggle `role_id` on the caller, or list the
    /// caller's options when no role is given
    #[instrument(skip(self))]
    pub async fn toggle_self(&self, guild_id: Snowflake, user_id: Snowflake, role_id: Option<Snowflake>) -> CommandReply {
        let toggles = match self.ctx.toggle_repo().list_by_guild(guild_id).await {
            Ok(toggles) => toggles,
            Err(e) => {
                error!(guild_id = %guild_id, error = %e, "Failed to load role toggles");
                return CommandReply::error("Failed to load role toggles.");
            }
        };
        if toggles.is_empty() {
            return CommandReply::info("No self-assignable roles are configured.");
        }

        let mut referenced: Vec<Snowflake> = toggles.iter().map(|t| t.role_id).collect();
        referenced.extend(role_id);
        let participants = match self.participants(guild_id, user_id, &referenced).await {
            Ok(participants) => participants,
            Err(reply) => return reply,
        };

        match role_id {
            Some(role_id) => self.toggle_one(guild_id, &participants, &toggles, role_id).await,
            None => list_available(&participants, &toggles),
        }
    }

    async fn toggle_one(
        &self,
        guild_id: Snowflake,
        participants: &Participants,
        toggles: &[RoleToggle],
        role_id: Snowflake,
    ) -> CommandReply {
        let not_assignable = || CommandReply::decline(DenialReason::NotSelfAssignable.message());
        let Some(toggle) = toggles.iter().find(|t| t.role_id == role_id) else {
            return not_assignable();
        };
        let Some(target) = participants.table.get(role_id) else {
            return not_assignable();
        };

        let member = &participants.member;
        let decision = resolve(&ResolveRequest {
            table: &participants.table,
            actor_roles: &member.role_ids,
            target,
            acting: Acting::SelfService,
            threshold: toggle.required_permissions,
        });
        if let Resolution::Denied(reason) = decision {
            return CommandReply::decline(reason.message());
        }
        if let Resolution::Denied(reason) = bot_resolution(participants, target) {
            return CommandReply::decline(reason.message());
        }

        let platform = self.ctx.platform();
        let had_role = member.has_role(role_id);
        let result = if had_role {
            platform.remove_member_role(guild_id, member.user_id, role_id).await
        } else {
            platform.add_member_role(guild_id, member.user_id, role_id).await
        };
        if let Err(e) = result {
            error!(guild_id = %guild_id, role_id = %role_id, error = %e, "Failed to toggle role");
            return CommandReply::error("Failed to toggle the role.");
        }

        self.ctx.role_lookup().evict_member(guild_id, member.user_id);
        info!(guild_id = %guild_id, user_id = %member.user_id, role_id = %role_id, added = !had_role, "Role toggled");
        self.ctx
            .audit(
                LogEventAction::new("role", LogLevel::Info, "Role self-toggled")
                    .with_guild(guild_id)
                    .with_field("role", format!("<@&{role_id}>"))
                    .with_field("user", format!("<@{}>", member.user_id))
                    .with_field("action", if had_role { "removed" } else { "added" }),
            )
            .await;

        if had_role {
            CommandReply::success(format!("Removed <@&{role_id}>."))
        } else {
            CommandReply::success(format!("Added <@&{role_id}>."))
        }
    }

    /// Human then bot checks for a toggle configuration change
    async fn authorize_manager(&self, guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) -> Result<(), CommandReply> {
        let participants = self.participants(guild_id, user_id, &[role_id]).await?;
        let Some(target) = participants.table.get(role_id) else {
            return Err(CommandReply::decline("That role does not exist in this server."));
        };

        let is_owner = match self.ctx.role_lookup().guild_owner(guild_id).await {
            Ok(owner) => owner == user_id,
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Unable to resolve guild owner");
                return Err(CommandReply::warn(ROLES_UNVERIFIED));
            }
        };

        let decision = resolve(&ResolveRequest {
            table: &participants.table,
            actor_roles: &participants.member.role_ids,
            target,
            acting: Acting::Manager { is_owner },
            threshold: Permissions::empty(),
        });
        if let Resolution::Denied(reason) = decision {
            return Err(CommandReply::decline(reason.message()));
        }
        if let Resolution::Denied(reason) = bot_resolution(&participants, target) {
            return Err(CommandReply::decline(reason.message()));
        }
        Ok(())
    }

    /// Bot from the snapshot, the caller fresh from the platform
    async fn participants(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        referenced: &[Snowflake],
    ) -> Result<Participants, CommandReply> {
        let lookup = self.ctx.role_lookup();

        let bot = match lookup.member(guild_id, self.ctx.application_id()).await {
            Ok(bot) => bot,
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Unable to resolve bot role state");
                return Err(CommandReply::warn(DenialReason::BotUnverified.message()));
            }
        };

        let mut extra = referenced.to_vec();
        extra.extend_from_slice(&bot.role_ids);
        match lookup.actor(guild_id, user_id, &extra).await {
            Ok(ActorContext { member, table }) => Ok(Participants { member, bot, table }),
            Err(e) if e.is_not_found() => {
                warn!(guild_id = %guild_id, user_id = %user_id, "Member not found");
                Err(CommandReply::error(MISSING_MEMBER))
            }
            Err(e) => {
                warn!(guild_id = %guild_id, user_id = %user_id, error = %e, "Unable to resolve member roles");
                Err(CommandReply::warn(ROLES_UNVERIFIED))
            }
        }
    }

    /// Re-render role lists and record the change
    async fn roster_changed(&self, guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake, title: &str) {
        if let Err(e) = self.sync(guild_id).await {
            warn!(guild_id = %guild_id, error = %e, "Failed to synchronize role lists");
        }
        self.ctx
            .audit(
                LogEventAction::new("role", LogLevel::Info, title)
                    .with_guild(guild_id)
                    .with_field("role", format!("<@&{role_id}>"))
                    .with_field("by", format!("<@{user_id}>")),
            )
            .await;
    }

    async fn sync(&self, guild_id: Snowflake) -> ServiceResult<usize> {
        StaticMessageSynchronizer::new(self.ctx).role_list_changed(guild_id).await
    }
}

fn bot_resolution(participants: &Participants, target: &GuildRole) -> Resolution {
    resolve(&ResolveRequest {
        table: &participants.table,
        actor_roles: &participants.bot.role_ids,
        target,
        acting: Acting::Bot,
        threshold: Permissions::empty(),
    })
}

/// The caller's view of the toggles they may use
fn list_available(participants: &Participants, toggles: &[RoleToggle]) -> CommandReply {
    let state = RoleHierarchyState::for_member(&participants.member, &participants.table);
    let mut have = Vec::new();
    let mut available = Vec::new();

    for toggle in toggles {
        if !state.permissions.satisfies(toggle.required_permissions) {
            continue;
        }
        if let Some(role) = participants.table.get(toggle.role_id) {
            if !bot_resolution(participants, role).is_allowed() {
                continue;
            }
        }

        let line = match toggle.description.as_deref() {
            Some(desc) => format!("<@&{}> - {desc}", toggle.role_id),
            None => format!("<@&{}>", toggle.role_id),
        };
        if participants.member.has_role(toggle.role_id) {
            have.push(line);
        } else {
            available.push(line);
        }
    }

    if have.is_empty() && available.is_empty() {
        return CommandReply::info("No self-assignable roles are available to you.");
    }

    let join = |lines: Vec<String>| if lines.is_empty() { "None".to_string() } else { lines.join("\n") };
    CommandReply::titled(
        Tone::Info,
        "Self-assignable roles",
        "Use `/toggle-role` with a role to toggle it.",
    )
    .with_field("You have", join(have))
    .with_field("Available", join(available))
}
