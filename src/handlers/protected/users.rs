// handlers/protected/users.rs - user profiles

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::auth::hash_password_blocking;
use crate::database::{NewUser, User};
use crate::error::ApiError;
use crate::handlers::body::JsonOrForm;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{validate_user, UserInput};

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(ApiResponse::success(state.store.list_users().await?))
}

/// GET /users/:username
pub async fn get(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<User> {
    state
        .store
        .find_user(&username)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(&username))
}

/// PUT /users/:username - replace profile fields, same rules as registration
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(username): Path<String>,
    JsonOrForm(input): JsonOrForm<UserInput>,
) -> ApiResult<User> {
    let valid = validate_user(input, state.config.validation.min_username_length)?;

    let password_hash =
        hash_password_blocking(valid.password, state.config.security.bcrypt_cost).await?;

    let user = state
        .store
        .update_user(
            &username,
            NewUser {
                username: valid.username,
                password_hash,
                email: valid.email,
                birthday: valid.birthday,
            },
        )
        .await?
        .ok_or_else(|| not_found(&username))?;

    tracing::info!(actor = %auth.username, from = %username, to = %user.username, "Updated user");
    Ok(ApiResponse::success(user))
}

/// DELETE /users/:username - plain-text confirmation
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<String, ApiError> {
    if !state.store.delete_user(&username).await? {
        return Err(not_found(&username));
    }

    tracing::info!(actor = %auth.username, username = %username, "Deleted user");
    Ok(format!("{} was deleted.", username))
}

pub(crate) fn not_found(username: &str) -> ApiError {
    ApiError::not_found(format!("{} was not found.", username))
}
