// Catalog endpoints

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use super::{ok, ok_with_message, parse_id, ApiError, ApiResult, Auth, Empty};
use crate::events::StoreEvent;
use crate::server::AppState;
use crate::store::{Animal, AnimalFilter, NewAnimal};

#[derive(Debug, Serialize)]
pub struct AnimalsPayload {
    pub animals: Vec<Animal>,
}

#[derive(Debug, Serialize)]
pub struct AnimalPayload {
    pub animal: Animal,
}

/// GET /api/animals?species=dog&ongId=1
pub async fn list_animals(
    State(state): State<AppState>,
    query: Result<Query<AnimalFilter>, QueryRejection>,
) -> ApiResult<AnimalsPayload> {
    let Query(filter) = query?;
    let animals = state.store.list_animals(&filter)?;
    ok(AnimalsPayload { animals })
}

/// GET /api/animals/:id
pub async fn get_animal(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<AnimalPayload> {
    let id = parse_id(&raw_id, "animal")?;
    let animal = state
        .store
        .find_animal(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Animal {} not found", id)))?;
    ok(AnimalPayload { animal })
}

/// POST /api/animals - Publish a listing owned by the calling shelter
pub async fn add_animal(
    State(state): State<AppState>,
    auth: Auth,
    body: Result<Json<NewAnimal>, JsonRejection>,
) -> ApiResult<AnimalPayload> {
    auth.require_ong()?;
    let Json(mut new_animal) = body?;

    // The caller owns what it creates, whatever the body says
    new_animal.ong_id = Some(auth.user_id);
    let animal = state.store.add_animal(new_animal)?;

    tracing::info!(
        animal_id = animal.id,
        ong_id = auth.user_id,
        "Added {} ({})",
        animal.name,
        animal.species
    );
    state.emit(StoreEvent::AnimalAdded {
        timestamp: Utc::now(),
        animal_id: animal.id,
        name: animal.name.clone(),
        species: animal.species,
        ong_id: animal.ong_id,
    });

    ok_with_message("Animal added", AnimalPayload { animal })
}

/// DELETE /api/animals/:id
///
/// Shelters may delete their own listings and any listing without an owner.
pub async fn delete_animal(
    State(state): State<AppState>,
    auth: Auth,
    Path(raw_id): Path<String>,
) -> ApiResult<Empty> {
    auth.require_ong()?;
    let id = parse_id(&raw_id, "animal")?;

    let animal = state
        .store
        .find_animal(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Animal {} not found", id)))?;

    if animal.ong_id.is_some_and(|owner| owner != auth.user_id) {
        return Err(ApiError::Forbidden(
            "Animal belongs to another shelter".into(),
        ));
    }

    let removed = state.store.remove_animal_by_id(id)?;
    tracing::info!(animal_id = id, ong_id = auth.user_id, "Removed {}", removed.name);
    state.emit(StoreEvent::AnimalRemoved {
        timestamp: Utc::now(),
        animal_id: id,
        removed_by: auth.user_id,
    });

    ok_with_message("Animal removed", Empty {})
}
