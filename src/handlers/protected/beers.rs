// handlers/protected/beers.rs - BeerBible beer catalog

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::database::Beer;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{validate_beer, BeerInput};

/// GET /beers
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Beer>> {
    Ok(ApiResponse::success(state.store.list_beers().await?))
}

/// GET /beers/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Beer> {
    let id = parse_id(&id, "beer")?;
    state
        .store
        .find_beer(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(id))
}

/// POST /beers
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<BeerInput>, JsonRejection>,
) -> ApiResult<Beer> {
    let Json(input) = payload?;
    let beer = state.store.insert_beer(validate_beer(input)?).await?;

    tracing::info!(actor = %auth.username, beer = %beer.id, "Created beer");
    Ok(ApiResponse::created(beer))
}

/// DELETE /beers/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    let id = parse_id(&id, "beer")?;
    if !state.store.delete_beer(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(actor = %auth.username, beer = %id, "Deleted beer");
    Ok(format!("Beer {} was deleted.", id))
}

pub(crate) fn not_found(id: uuid::Uuid) -> ApiError {
    ApiError::not_found(format!("Beer {} was not found.", id))
}
