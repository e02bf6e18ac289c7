// handlers/public/register.rs - POST /users

use axum::extract::State;

use crate::auth::hash_password_blocking;
use crate::database::{NewUser, User};
use crate::handlers::body::JsonOrForm;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{validate_user, UserInput};

/// POST /users - register a new account
///
/// Every field rule is checked before anything is stored; the password is
/// bcrypt-hashed and a taken username or email answers 409.
pub async fn register_post(
    State(state): State<AppState>,
    JsonOrForm(input): JsonOrForm<UserInput>,
) -> ApiResult<User> {
    let valid = validate_user(input, state.config.validation.min_username_length)?;

    let password_hash =
        hash_password_blocking(valid.password, state.config.security.bcrypt_cost).await?;

    let user = state
        .store
        .insert_user(NewUser {
            username: valid.username,
            password_hash,
            email: valid.email,
            birthday: valid.birthday,
        })
        .await?;

    tracing::info!(username = %user.username, "Registered user");
    Ok(ApiResponse::created(user))
}
