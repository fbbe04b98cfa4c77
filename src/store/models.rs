//! # Entity types held by the store
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | A registered account, either an adopter (`client`) or a shelter (`ong`). Holds the password in plaintext. |
//! | [`UserInfo`] | The client-safe projection of a user. Everything the API returns about a user goes through this type, so the password never reaches the wire. |
//! | [`Animal`] | A listing in the swipe catalog, optionally owned by a shelter. |
//! | [`Action`] | One adopt/reject decision. Append-only. |
//! | [`Match`] | A pending or approved adoption interest, created from an adopt action. |
//! | [`Message`] | One chat line inside a match thread. |
//!
//! The `New*` structs are the insert payloads: they deserialize straight from
//! request bodies and carry no identifier. The store assigns ids.
//!
//! JSON uses camelCase keys. `User::user_type` and `Animal::species` are both
//! published under the key `type`, which is what the browser pages send.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric identifier assigned by a per-collection counter.
pub type Id = u64;

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// Account kind. Shelters manage listings; clients swipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Client,
    Ong,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Ong => "ong",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored user record. Not `Serialize` on purpose: use [`User::to_info`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Id,
    pub email: String,
    pub password: String,
    pub name: String,
    pub user_type: UserType,
    pub phone: String,
    pub city: String,
}

impl User {
    /// Client-safe view without the password.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            user_type: self.user_type,
            phone: self.phone.clone(),
            city: self.city.clone(),
        }
    }
}

/// User as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Id,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub phone: String,
    pub city: String,
}

/// Registration payload.
///
/// `type` is optional and defaults to `client`; the public registration page
/// never sends it. Extra keys such as `confirmPassword` are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub user_type: UserType,
    pub phone: String,
    pub city: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Animals
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: Id,
    pub name: String,
    /// Free text, e.g. "2 anos"
    pub age: String,
    pub breed: String,
    pub location: String,
    pub image: Option<String>,
    pub characteristics: Vec<String>,
    pub bio: String,
    /// Free text ("Grande", "Médio", ...). Spelling varies between entries.
    pub size: String,
    #[serde(rename = "type")]
    pub species: Species,
    /// Owning shelter, `None` for catalog entries seeded at startup
    pub ong_id: Option<Id>,
}

/// Listing payload as posted by the admin panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnimal {
    pub name: String,
    pub age: String,
    pub breed: String,
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
    pub characteristics: Vec<String>,
    pub bio: String,
    pub size: String,
    #[serde(rename = "type")]
    pub species: Species,
    #[serde(default)]
    pub ong_id: Option<Id>,
}

impl NewAnimal {
    pub(crate) fn into_animal(self, id: Id) -> Animal {
        Animal {
            id,
            name: self.name,
            age: self.age,
            breed: self.breed,
            location: self.location,
            image: self.image,
            characteristics: self.characteristics,
            bio: self.bio,
            size: self.size,
            species: self.species,
            ong_id: self.ong_id,
        }
    }
}

/// Optional filters for listing animals. `Default` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalFilter {
    pub species: Option<Species>,
    pub ong_id: Option<Id>,
}

impl AnimalFilter {
    pub fn matches(&self, animal: &Animal) -> bool {
        self.species.is_none_or(|s| animal.species == s)
            && self.ong_id.is_none_or(|id| animal.ong_id == Some(id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

/// A swipe decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Adopt,
    Reject,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adopt => "adopt",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: Id,
    pub animal_id: Id,
    pub action: ActionKind,
    pub user_id: Id,
    pub timestamp: DateTime<Utc>,
}

/// Payload of `POST /api/actions`. Ids are not checked against the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAction {
    pub animal_id: Id,
    pub action: ActionKind,
    pub user_id: Id,
}

// ─────────────────────────────────────────────────────────────────────────────
// Stats
// ─────────────────────────────────────────────────────────────────────────────

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub dogs: usize,
    pub cats: usize,
    /// Number of adopt actions
    pub adopted: usize,
    /// Number of actions of any kind
    pub interested: usize,
}

/// Restricts stats to one shelter's animals. `Default` is global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsScope {
    pub ong_id: Option<Id>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Matches and chat
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Approved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Id,
    pub animal_id: Id,
    pub user_id: Id,
    /// Owner of the animal when the match opened. Kept after the animal is
    /// deleted so the thread stays private to that shelter.
    pub ong_id: Option<Id>,
    pub action_id: Id,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

/// Selects matches by shelter and/or client. A shelter sees the matches it
/// owns plus those opened on animals nobody owned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub ong_id: Option<Id>,
    pub user_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Id,
    pub match_id: Id,
    pub sender_id: Id,
    pub sender_role: UserType,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub match_id: Id,
    pub sender_id: Id,
    pub sender_role: UserType,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_has_no_password() {
        let user = User {
            id: 7,
            email: "ana@email.com".to_string(),
            password: "segredo".to_string(),
            name: "Ana".to_string(),
            user_type: UserType::Client,
            phone: "11 99999-0000".to_string(),
            city: "São Paulo".to_string(),
        };

        let json = serde_json::to_value(user.to_info()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["type"], "client");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_new_user_defaults_to_client() {
        let new: NewUser = serde_json::from_str(
            r#"{"name":"Ana","email":"a@b.c","phone":"1","city":"Recife","password":"123456","confirmPassword":"123456"}"#,
        )
        .unwrap();
        assert_eq!(new.user_type, UserType::Client);
    }

    #[test]
    fn test_new_animal_from_admin_form() {
        let new: NewAnimal = serde_json::from_str(
            r#"{"name":"Mimi","age":"1 ano","type":"cat","breed":"SRD","size":"Pequeno",
                "location":"Recife, PE","characteristics":["Calma"],"bio":"Oi","image":null,"ongId":3}"#,
        )
        .unwrap();
        let animal = new.into_animal(9);
        assert_eq!(animal.species, Species::Cat);
        assert_eq!(animal.ong_id, Some(3));
        assert!(animal.image.is_none());
    }

    #[test]
    fn test_new_animal_missing_field_is_rejected() {
        let parsed: Result<NewAnimal, _> =
            serde_json::from_str(r#"{"name":"Mimi","type":"cat"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_filter_matches() {
        let animal = NewAnimal {
            name: "Thor".into(),
            age: "3 anos".into(),
            breed: "Pastor Alemão".into(),
            location: "Curitiba, PR".into(),
            image: None,
            characteristics: vec![],
            bio: String::new(),
            size: "Grande".into(),
            species: Species::Dog,
            ong_id: Some(2),
        }
        .into_animal(1);

        assert!(AnimalFilter::default().matches(&animal));
        assert!(AnimalFilter { species: Some(Species::Dog), ong_id: Some(2) }.matches(&animal));
        assert!(!AnimalFilter { species: Some(Species::Cat), ong_id: None }.matches(&animal));
        assert!(!AnimalFilter { species: None, ong_id: Some(5) }.matches(&animal));
    }
}
