//! Static message entity <-> model mapper

use tally_core::{DomainError, Snowflake, StaticMessage};

use crate::models::StaticMessageModel;

impl TryFrom<StaticMessageModel> for StaticMessage {
    type Error = DomainError;

    fn try_from(model: StaticMessageModel) -> Result<Self, Self::Error> {
        let corrupt = |e: DomainError| DomainError::DatabaseError(e.to_string());
        Ok(StaticMessage {
            guild_id: Snowflake::new(model.guild_id),
            channel_id: Snowflake::new(model.channel_id),
            message_id: Snowflake::new(model.message_id),
            kind: model.kind.parse().map_err(corrupt)?,
            config: model.config,
            cadence: model.cadence.parse().map_err(corrupt)?,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tally_core::{StaticMessageKind, UpdateCadence};

    fn model(kind: &str) -> StaticMessageModel {
        StaticMessageModel {
            guild_id: 1,
            channel_id: 2,
            message_id: 3,
            kind: kind.to_string(),
            config: String::new(),
            cadence: "daily".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_entity() {
        let message = StaticMessage::try_from(model("role_toggles")).unwrap();
        assert_eq!(message.kind, StaticMessageKind::RoleList);
        assert_eq!(message.cadence, UpdateCadence::Daily);
    }

    #[test]
    fn test_unknown_kind_is_a_database_error() {
        let err = StaticMessage::try_from(model("poll")).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
