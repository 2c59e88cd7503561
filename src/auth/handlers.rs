use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ChangePasswordRequest, LoginRequest, PublicUser, RegisterRequest, TokenResponse,
            UserSummary,
        },
        extractors::AuthUser,
        services,
    },
    error::AppError,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/change-password", post(change_password))
        .route("/auth/deactivate", post(deactivate))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserSummary>), AppError> {
    let user = services::create_user(
        state.users.as_ref(),
        &payload.email,
        &payload.username,
        &payload.password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user =
        services::verify_credentials(state.users.as_ref(), &payload.email, &payload.password)
            .await?;

    if !user.is_active {
        warn!(user_id = %user.id, "login on inactive account");
        return Err(AppError::InactiveAccount);
    }

    let issued = state.jwt.issue(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "bearer".into(),
        expires_at: issued.expires_at,
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = services::load_active_user(state.users.as_ref(), user_id).await?;
    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
        username: user.username,
    }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    services::change_password(
        state.users.as_ref(),
        user_id,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn deactivate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<StatusCode, AppError> {
    services::deactivate(state.users.as_ref(), user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
