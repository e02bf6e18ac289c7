// handlers/protected/breweries.rs - breweries and the beers they brew

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::database::Brewery;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{validate_brewery, BreweryInput};

/// GET /breweries
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Brewery>> {
    Ok(ApiResponse::success(state.store.list_breweries().await?))
}

/// GET /breweries/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Brewery> {
    let id = parse_id(&id, "brewery")?;
    state
        .store
        .find_brewery(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(id))
}

/// POST /breweries
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<BreweryInput>, JsonRejection>,
) -> ApiResult<Brewery> {
    let Json(input) = payload?;
    let brewery = state.store.insert_brewery(validate_brewery(input)?).await?;

    tracing::info!(actor = %auth.username, brewery = %brewery.id, "Created brewery");
    Ok(ApiResponse::created(brewery))
}

/// POST /breweries/:id/beers/:beer_id
pub async fn add_beer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((id, beer_id)): Path<(String, String)>,
) -> ApiResult<Brewery> {
    let id = parse_id(&id, "brewery")?;
    let beer_id = parse_id(&beer_id, "beer")?;

    if state.store.find_beer(beer_id).await?.is_none() {
        return Err(super::beers::not_found(beer_id));
    }

    let brewery = state
        .store
        .add_brewery_beer(id, beer_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(actor = %auth.username, brewery = %id, beer = %beer_id, "Added beer to brewery");
    Ok(ApiResponse::success(brewery))
}

/// DELETE /breweries/:id/beers/:beer_id
pub async fn remove_beer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((id, beer_id)): Path<(String, String)>,
) -> ApiResult<Brewery> {
    let id = parse_id(&id, "brewery")?;
    let beer_id = parse_id(&beer_id, "beer")?;

    let brewery = state
        .store
        .remove_brewery_beer(id, beer_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(actor = %auth.username, brewery = %id, beer = %beer_id, "Removed beer from brewery");
    Ok(ApiResponse::success(brewery))
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("Brewery {} was not found.", id))
}
