//! Emoji references and their canonical comparison key
//!
//! Reaction events and command input name an emoji either by a custom
//! emoji id (plus a cosmetic name) or by a literal unicode sequence.
//! [`EmojiRef::key`] reduces both forms to an [`EmojiKey`], which is the
//! only thing the rest of the system compares.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::{Snowflake, SnowflakeParseError};

static CUSTOM_EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<(a?):([a-zA-Z0-9_]+):([0-9]+)>$").expect("custom emoji pattern is valid")
});

/// Longest literal accepted as a unicode emoji from user input
const MAX_LITERAL_LEN: usize = 64;

/// An emoji as referenced by a platform event or a command option
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmojiRef {
    /// Custom emoji id; absent for unicode emojis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Snowflake>,
    /// Custom emoji name, or the unicode literal itself
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub animated: bool,
}

/// Canonical, comparable emoji identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmojiKey {
    /// Custom emojis compare by id only; renames do not change identity
    Custom(Snowflake),
    /// Unicode emojis compare by their trimmed literal
    Unicode(String),
}

/// Error when parsing an emoji from command input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmojiParseError {
    #[error("emoji is required")]
    Empty,

    #[error("emoji is not a valid custom emoji or unicode emoji")]
    Malformed,

    #[error("emoji is too long")]
    TooLong,

    #[error("invalid emoji id: {0}")]
    InvalidId(#[from] SnowflakeParseError),
}

impl EmojiRef {
    pub fn unicode(literal: impl Into<String>) -> Self {
        Self {
            id: None,
            name: literal.into(),
            animated: false,
        }
    }

    pub fn custom(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            animated: false,
        }
    }

    /// Normalize into the comparison key.
    ///
    /// A zero id counts as absent. Returns `None` when the reference names
    /// nothing (no id and a blank name); such reactions are ignored.
    pub fn key(&self) -> Option<EmojiKey> {
        match self.id {
            Some(id) if !id.is_zero() => Some(EmojiKey::Custom(id)),
            _ => {
                let name = self.name.trim();
                if name.is_empty() {
                    None
                } else {
                    Some(EmojiKey::Unicode(name.to_string()))
                }
            }
        }
    }

    /// Parse command input: `<:name:id>`, `<a:name:id>`, or a unicode literal.
    pub fn parse_input(raw: &str) -> Result<Self, EmojiParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(EmojiParseError::Empty);
        }

        if let Some(caps) = CUSTOM_EMOJI.captures(raw) {
            let id = Snowflake::parse(&caps[3])?;
            return Ok(Self {
                id: Some(id),
                name: caps[2].to_string(),
                animated: !caps[1].is_empty(),
            });
        }

        if raw.starts_with('<') || raw.chars().any(char::is_whitespace) {
            return Err(EmojiParseError::Malformed);
        }
        if raw.len() > MAX_LITERAL_LEN {
            return Err(EmojiParseError::TooLong);
        }
        Ok(Self::unicode(raw))
    }

    /// Whether this is a guild custom emoji
    pub fn is_custom(&self) -> bool {
        self.id.is_some_and(|id| !id.is_zero())
    }
}

impl fmt::Display for EmojiRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) if !id.is_zero() => {
                let prefix = if self.animated { "a" } else { "" };
                write!(f, "<{prefix}:{}:{id}>", self.name)
            }
            _ => write!(f, "{}", self.name.trim()),
        }
    }
}

impl EmojiKey {
    /// Stable string form used as a storage column value
    pub fn storage_key(&self) -> String {
        match self {
            EmojiKey::Custom(id) => format!("c:{id}"),
            EmojiKey::Unicode(literal) => format!("u:{literal}"),
        }
    }

    /// Inverse of [`EmojiKey::storage_key`]
    pub fn from_storage(raw: &str) -> Option<Self> {
        if let Some(id) = raw.strip_prefix("c:") {
            return Snowflake::parse(id).ok().map(EmojiKey::Custom);
        }
        raw.strip_prefix("u:")
            .filter(|literal| !literal.is_empty())
            .map(|literal| EmojiKey::Unicode(literal.to_string()))
    }
}

impl fmt::Display for EmojiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

impl Serialize for EmojiKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.storage_key())
    }
}

impl<'de> Deserialize<'de> for EmojiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        EmojiKey::from_storage(&raw).ok_or_else(|| serde::de::Error::custom("invalid emoji key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_emoji_keys_by_id_only() {
        let a = EmojiRef::custom(Snowflake::new(42), "party");
        let b = EmojiRef::custom(Snowflake::new(42), "renamed_party");
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), Some(EmojiKey::Custom(Snowflake::new(42))));
    }

    #[test]
    fn test_unicode_emoji_key_is_trimmed_literal() {
        let emoji = EmojiRef::unicode(" 🔥 ");
        assert_eq!(emoji.key(), Some(EmojiKey::Unicode("🔥".to_string())));
    }

    #[test]
    fn test_zero_id_falls_back_to_name() {
        let emoji = EmojiRef {
            id: Some(Snowflake::ZERO),
            name: "👍".to_string(),
            animated: false,
        };
        assert_eq!(emoji.key(), Some(EmojiKey::Unicode("👍".to_string())));
        assert!(!emoji.is_custom());
    }

    #[test]
    fn test_blank_reference_has_no_key() {
        assert_eq!(EmojiRef::default().key(), None);
        assert_eq!(EmojiRef::unicode("   ").key(), None);
    }

    #[test]
    fn test_parse_custom_input() {
        let emoji = EmojiRef::parse_input("<:pog:123456>").unwrap();
        assert_eq!(emoji.id, Some(Snowflake::new(123_456)));
        assert_eq!(emoji.name, "pog");
        assert!(!emoji.animated);

        let animated = EmojiRef::parse_input("<a:dance:99>").unwrap();
        assert!(animated.animated);
        assert_eq!(animated.to_string(), "<a:dance:99>");
    }

    #[test]
    fn test_parse_unicode_input() {
        let emoji = EmojiRef::parse_input(" 🔥").unwrap();
        assert_eq!(emoji, EmojiRef::unicode("🔥"));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(EmojiRef::parse_input(""), Err(EmojiParseError::Empty));
        assert_eq!(EmojiRef::parse_input("<:broken>"), Err(EmojiParseError::Malformed));
        assert_eq!(EmojiRef::parse_input("two words"), Err(EmojiParseError::Malformed));
        assert_eq!(
            EmojiRef::parse_input(&"x".repeat(65)),
            Err(EmojiParseError::TooLong)
        );
    }

    #[test]
    fn test_storage_key_round_trip() {
        for key in [
            EmojiKey::Custom(Snowflake::new(7)),
            EmojiKey::Unicode("🔥".to_string()),
        ] {
            assert_eq!(EmojiKey::from_storage(&key.storage_key()), Some(key));
        }
        assert_eq!(EmojiKey::from_storage("x:1"), None);
        assert_eq!(EmojiKey::from_storage("u:"), None);
    }
}
