//! # Entity store
//!
//! In-memory collections of users, animals, actions, matches and chat
//! messages behind the [`Repository`] trait.
//!
//! - [`models`]: entity and payload types (wire format lives here too)
//! - [`Repository`]: the abstraction handlers depend on
//! - [`MemoryStore`]: the only implementation; state lives for the process lifetime
//! - [`seed`]: startup catalog

pub mod models;
pub mod seed;

mod memory;
mod repository;

pub use memory::MemoryStore;
pub use models::{
    Action, ActionKind, Animal, AnimalFilter, Id, Match, MatchFilter, MatchStatus, Message,
    NewAction, NewAnimal, NewMessage, NewUser, Species, Stats, StatsScope, User, UserInfo,
    UserType,
};
pub use repository::{Repository, StoreError, StoreResult};
