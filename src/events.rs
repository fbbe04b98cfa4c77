// Events emitted by the API handlers after each successful store mutation
//
// Handlers push these into a bounded channel; the journal task drains it and
// appends one JSON object per line.

use crate::store::{ActionKind, Id, Species, UserType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Main event type that flows from the server to the journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")] // Creates JSON like {"type": "AnimalAdded", ...}
pub enum StoreEvent {
    /// A new account was created
    UserRegistered {
        timestamp: DateTime<Utc>,
        user_id: Id,
        email: String,
        user_type: UserType,
    },

    /// Login attempt that matched no user
    LoginFailed {
        timestamp: DateTime<Utc>,
        email: String,
    },

    /// A shelter published a listing
    AnimalAdded {
        timestamp: DateTime<Utc>,
        animal_id: Id,
        name: String,
        species: Species,
        ong_id: Option<Id>,
    },

    /// A listing was deleted
    AnimalRemoved {
        timestamp: DateTime<Utc>,
        animal_id: Id,
        removed_by: Id,
    },

    /// A swipe decision was logged
    ActionRecorded {
        timestamp: DateTime<Utc>,
        action_id: Id,
        animal_id: Id,
        user_id: Id,
        action: ActionKind,
        /// Set when the action opened a match
        match_id: Option<Id>,
    },

    /// A shelter approved an adoption
    MatchApproved {
        timestamp: DateTime<Utc>,
        match_id: Id,
        approved_by: Id,
    },

    /// A chat line was posted on a match
    MessageSent {
        timestamp: DateTime<Utc>,
        match_id: Id,
        message_id: Id,
        sender_id: Id,
    },
}

impl StoreEvent {
    /// Name of the variant (matches the JSON "type" field)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "UserRegistered",
            Self::LoginFailed { .. } => "LoginFailed",
            Self::AnimalAdded { .. } => "AnimalAdded",
            Self::AnimalRemoved { .. } => "AnimalRemoved",
            Self::ActionRecorded { .. } => "ActionRecorded",
            Self::MatchApproved { .. } => "MatchApproved",
            Self::MessageSent { .. } => "MessageSent",
        }
    }
}

/// Generate a unique run ID for journal file naming
/// Format: YYYYMMDD-HHMMSS-XXXX (timestamp + 4 random hex chars)
pub fn generate_session_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let random = uuid::Uuid::new_v4().as_u128();
    format!("{}-{:04x}", timestamp, random & 0xFFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event = StoreEvent::LoginFailed {
            timestamp: Utc::now(),
            email: "x@y.z".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
        assert_eq!(json["email"], "x@y.z");
    }

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        // YYYYMMDD-HHMMSS-XXXX
        assert_eq!(id.len(), 20);
        assert_eq!(id.matches('-').count(), 2);
    }
}
