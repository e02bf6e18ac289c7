// handlers/protected/movies.rs - read-only movie catalog

use axum::extract::{Path, State};

use crate::database::{Director, Genre, Movie};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /movies
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Movie>> {
    Ok(ApiResponse::success(state.store.list_movies().await?))
}

/// GET /movies/:title
pub async fn by_title(State(state): State<AppState>, Path(title): Path<String>) -> ApiResult<Movie> {
    state
        .store
        .find_movie_by_title(&title)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("No movie titled '{}'", title)))
}

/// GET /movies/genres/:genre
pub async fn genre(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Genre> {
    state
        .store
        .find_genre(&name)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("No genre named '{}'", name)))
}

/// GET /movies/directors/:director
pub async fn director(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Director> {
    state
        .store
        .find_director(&name)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("No director named '{}'", name)))
}

/// GET /movies/actors/:actor - may be empty
pub async fn by_actor(State(state): State<AppState>, Path(actor): Path<String>) -> ApiResult<Vec<Movie>> {
    Ok(ApiResponse::success(state.store.find_movies_by_actor(&actor).await?))
}
