// Repository abstraction over the entity collections
//
// Handlers only ever see `dyn Repository`, so a persistent backend can be
// dropped in without touching them. All methods take `&self`; implementations
// are responsible for their own interior locking.

use super::models::{
    Action, Animal, AnimalFilter, Id, Match, MatchFilter, Message, NewAction, NewAnimal,
    NewMessage, NewUser, Stats, StatsScope, User, UserType,
};

/// Errors surfaced by a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Registration with an email that is already taken
    DuplicateEmail(String),
    /// Lookup miss on a collection
    NotFound { entity: &'static str, id: Id },
    /// A previous holder of the store lock panicked
    LockPoisoned,
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        Self::NotFound { entity, id }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEmail(email) => write!(f, "email already registered: {}", email),
            Self::NotFound { entity, id } => write!(f, "{} {} not found", entity, id),
            Self::LockPoisoned => write!(f, "store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Create/read/update/delete over users, animals, actions, matches and messages.
pub trait Repository: Send + Sync {
    // Users
    fn add_user(&self, new: NewUser) -> StoreResult<User>;
    /// Exact, case-sensitive match on both fields
    fn find_user_by_credentials(&self, email: &str, password: &str) -> StoreResult<Option<User>>;
    fn find_user(&self, id: Id) -> StoreResult<Option<User>>;
    fn user_count(&self) -> StoreResult<usize>;

    // Animals
    fn add_animal(&self, new: NewAnimal) -> StoreResult<Animal>;
    fn list_animals(&self, filter: &AnimalFilter) -> StoreResult<Vec<Animal>>;
    fn find_animal(&self, id: Id) -> StoreResult<Option<Animal>>;
    fn animal_count(&self) -> StoreResult<usize>;
    fn remove_animal_by_id(&self, id: Id) -> StoreResult<Animal>;

    // Actions
    /// Appends to the action log. An adopt on an existing animal also opens a
    /// pending match; the match is returned alongside the action.
    fn record_action(&self, new: NewAction) -> StoreResult<(Action, Option<Match>)>;
    fn list_actions(&self) -> StoreResult<Vec<Action>>;
    fn compute_stats(&self, scope: &StatsScope) -> StoreResult<Stats>;

    // Matches
    fn list_matches(&self, filter: &MatchFilter) -> StoreResult<Vec<Match>>;
    fn find_match(&self, id: Id) -> StoreResult<Option<Match>>;
    fn approve_match(&self, id: Id) -> StoreResult<Match>;

    // Chat
    fn add_message(&self, new: NewMessage) -> StoreResult<Message>;
    fn list_messages(&self, match_id: Id) -> StoreResult<Vec<Message>>;
    /// Marks every message in the thread not sent by `reader` as read.
    /// Returns how many changed.
    fn mark_read(&self, match_id: Id, reader: UserType) -> StoreResult<usize>;
}
