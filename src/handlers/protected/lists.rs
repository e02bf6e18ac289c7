// handlers/protected/lists.rs - favorites and to-watch membership
//
// Each call is one atomic add/remove on the user record; the full list is
// never sent by the client.

use axum::{
    extract::{Path, State},
    Extension,
};

use super::users::not_found;
use crate::database::{User, UserList};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

type ListPath = Path<(String, String)>;

/// POST /users/:username/favorites/:movie_id
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((username, movie_id)): ListPath,
) -> ApiResult<User> {
    add(&state, &auth, &username, &movie_id, UserList::Favorites).await
}

/// DELETE /users/:username/favorites/:movie_id
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((username, movie_id)): ListPath,
) -> ApiResult<User> {
    remove(&state, &auth, &username, &movie_id, UserList::Favorites).await
}

/// POST /users/:username/ToWatch/:movie_id
pub async fn add_to_watch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((username, movie_id)): ListPath,
) -> ApiResult<User> {
    add(&state, &auth, &username, &movie_id, UserList::ToWatch).await
}

/// DELETE /users/:username/ToWatch/:movie_id
pub async fn remove_to_watch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((username, movie_id)): ListPath,
) -> ApiResult<User> {
    remove(&state, &auth, &username, &movie_id, UserList::ToWatch).await
}

async fn add(
    state: &AppState,
    auth: &AuthUser,
    username: &str,
    raw_movie_id: &str,
    list: UserList,
) -> ApiResult<User> {
    let movie_id = parse_id(raw_movie_id, "movie")?;

    // Only existing movies may be referenced
    if state.store.find_movie(movie_id).await?.is_none() {
        return Err(ApiError::not_found(format!("Movie {} was not found.", movie_id)));
    }

    let user = state
        .store
        .add_to_user_list(username, list, movie_id)
        .await?
        .ok_or_else(|| not_found(username))?;

    tracing::info!(actor = %auth.username, username, %movie_id, list = list.label(), "Added movie");
    Ok(ApiResponse::success(user))
}

async fn remove(
    state: &AppState,
    auth: &AuthUser,
    username: &str,
    raw_movie_id: &str,
    list: UserList,
) -> ApiResult<User> {
    let movie_id = parse_id(raw_movie_id, "movie")?;

    let user = state
        .store
        .remove_from_user_list(username, list, movie_id)
        .await?
        .ok_or_else(|| not_found(username))?;

    tracing::info!(actor = %auth.username, username, %movie_id, list = list.label(), "Removed movie");
    Ok(ApiResponse::success(user))
}
