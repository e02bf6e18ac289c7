// handlers/public/login.rs - POST /login

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, hash_password_blocking, verify_password_blocking};
use crate::database::User;
use crate::error::ApiError;
use crate::handlers::body::JsonOrForm;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

const BAD_CREDENTIALS: &str = "Incorrect username or password";

/// POST /login - exchange username and password for a bearer token
pub async fn login_post(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let Some(user) = state.store.find_user(&request.username).await? else {
        // Unknown users pay the same bcrypt cost as a failed verify
        hash_password_blocking(request.password, state.config.security.bcrypt_cost).await?;
        tracing::info!(username = %request.username, "Login failed: unknown user");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    };

    if !verify_password_blocking(request.password, user.password.clone()).await? {
        tracing::info!(username = %user.username, "Login failed: wrong password");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let token = generate_jwt(&user.username, &state.config.security)?;
    tracing::info!(username = %user.username, "Issued token");

    Ok(ApiResponse::success(LoginResponse { user, token }))
}
