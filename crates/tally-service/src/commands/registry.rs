//! Command registry built once at startup

use std::collections::HashMap;

/// Every command the engine answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    // Reaction tracking
    ReactionAdd,
    ReactionRemove,
    ReactionList,
    LeaderboardCreate,
    LeaderboardRemove,
    LeaderboardList,

    // Role toggles
    RoleAdd,
    RoleRemove,
    RoleMessageCreate,
    RoleMessageRemove,
    RoleMessageList,

    // Members
    ToggleRole,

    // Bot profile
    BotName,
    BotAvatar,
    BotBanner,
    BotAbout,
}

impl CommandKind {
    /// All kinds with their command paths
    pub const ALL: [(&'static str, CommandKind); 16] = [
        ("/reaction/add", CommandKind::ReactionAdd),
        ("/reaction/remove", CommandKind::ReactionRemove),
        ("/reaction/list", CommandKind::ReactionList),
        ("/reaction/leaderboard/create", CommandKind::LeaderboardCreate),
        ("/reaction/leaderboard/remove", CommandKind::LeaderboardRemove),
        ("/reaction/leaderboard/list", CommandKind::LeaderboardList),
        ("/role/add", CommandKind::RoleAdd),
        ("/role/remove", CommandKind::RoleRemove),
        ("/role/message-create", CommandKind::RoleMessageCreate),
        ("/role/message-remove", CommandKind::RoleMessageRemove),
        ("/role/message-list", CommandKind::RoleMessageList),
        ("/toggle-role", CommandKind::ToggleRole),
        ("/bot/name", CommandKind::BotName),
        ("/bot/avatar", CommandKind::BotAvatar),
        ("/bot/banner", CommandKind::BotBanner),
        ("/bot/about", CommandKind::BotAbout),
    ];

    /// Whether the command changes guild configuration
    pub fn is_admin(self) -> bool {
        !matches!(self, CommandKind::ToggleRole)
    }
}

/// Explicit path table, passed by reference to the router
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandKind>,
}

impl CommandRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// The full command set
    pub fn standard() -> Self {
        CommandKind::ALL
            .iter()
            .fold(Self::new(), |registry, (path, kind)| registry.with(path, *kind))
    }

    pub fn with(mut self, path: &str, kind: CommandKind) -> Self {
        self.commands.insert(normalize(path), kind);
        self
    }

    /// Look up a command path. Surrounding slashes and case are ignored.
    pub fn resolve(&self, path: &str) -> Option<CommandKind> {
        self.commands.get(&normalize(path)).copied()
    }

    /// Registered paths, sorted
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(path: &str) -> String {
    format!("/{}", path.trim().trim_matches('/').to_lowercase())
}
