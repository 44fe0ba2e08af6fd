//! Display bodies of the static messages

use std::fmt::Write;

use tally_core::{
    rank_entries, Embed, LeaderboardConfig, LeaderboardEntry, MessageBody, ReactionTrack,
    RoleListConfig, RoleToggle, Tone,
};

/// Most lines a leaderboard message shows
pub const MAX_LEADERBOARD_TOP: u32 = 25;

const LEADERBOARD_TITLE: &str = "Reaction Leaderboard";
const LEADERBOARD_EMPTY: &str = "No reactions tracked yet.";

pub const ROLE_LIST_TITLE: &str = "Self-assignable roles";
const ROLE_LIST_DESCRIPTION: &str = "Use `/toggle-role` to add or remove roles.";
const ROLE_LIST_EMPTY: &str = "No self-assignable roles are configured.";

/// Number of lines to show for a leaderboard config
pub fn leaderboard_size(config: &LeaderboardConfig, default_top: u32) -> usize {
    let top = config.top.filter(|top| *top > 0).unwrap_or(default_top);
    top.clamp(1, MAX_LEADERBOARD_TOP) as usize
}

/// Render a leaderboard from unsorted entries
pub fn leaderboard(
    config: &LeaderboardConfig,
    track: Option<&ReactionTrack>,
    entries: Vec<LeaderboardEntry>,
    default_top: u32,
) -> MessageBody {
    let title = config
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| track.map(|t| t.title.trim()).filter(|t| !t.is_empty()))
        .unwrap_or(LEADERBOARD_TITLE);
    let emoji = config.emoji().to_string();
    let title = if emoji.is_empty() {
        title.to_string()
    } else {
        format!("{emoji} {title}")
    };

    let ranked = rank_entries(entries, leaderboard_size(config, default_top));
    let description = if ranked.is_empty() {
        LEADERBOARD_EMPTY.to_string()
    } else {
        let width = ranked.len().to_string().len();
        let mut lines = String::new();
        for (index, entry) in ranked.iter().enumerate() {
            if index > 0 {
                lines.push('\n');
            }
            let _ = write!(lines, "{:0width$}. <@{}> - {}", index + 1, entry.user_id, entry.count);
        }
        lines
    };

    MessageBody::embed(Embed::toned(Tone::Info, &title, &description))
}

/// Render the self-assignable role roster
pub fn role_list(config: &RoleListConfig, toggles: &[RoleToggle]) -> MessageBody {
    let title = non_blank(config.title.as_deref()).unwrap_or(ROLE_LIST_TITLE);
    let description = non_blank(config.description.as_deref()).unwrap_or(ROLE_LIST_DESCRIPTION);

    let mut sorted: Vec<&RoleToggle> = toggles.iter().collect();
    sorted.sort_by_key(|toggle| toggle.role_id);

    let roster = if sorted.is_empty() {
        ROLE_LIST_EMPTY.to_string()
    } else {
        sorted
            .iter()
            .map(|toggle| match toggle.description.as_deref() {
                Some(desc) => format!("<@&{}> - {desc}", toggle.role_id),
                None => format!("<@&{}>", toggle.role_id),
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    MessageBody::embed(Embed::toned(Tone::Info, title, description).with_field("Roles", roster, false))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
