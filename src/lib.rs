// PetMatch - pet adoption matching service
//
// A small JSON API over an in-memory store, plus a terminal swiper that
// drives the same card gestures as the web page.
//
// Architecture:
// - Store: users, animals, actions, matches and chat messages behind a Repository trait
// - Server (axum): routes, JSON envelopes, bearer sessions
// - Swipe: gesture state machine, card deck, HTTP client, ratatui front-end
// - Journal: store events written to JSON Lines files over an mpsc channel

pub mod config;
pub mod events;
pub mod server;
pub mod storage;
pub mod store;
pub mod swipe;

pub use server::{build_router, start_server, AppState};
pub use store::{MemoryStore, Repository};
