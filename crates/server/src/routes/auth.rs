//! Authentication routes: register, login, logout, current user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_sessions::Session;

use shopreel_core::UserRole;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireUser;
use crate::models::user::{CurrentUser, session_keys};
use crate::services::auth::AuthService;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: UserRole,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Create an account and sign the new user in.
async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<CurrentUser>)> {
    let user = AuthService::new(state.pool())
        .register(&body.email, &body.password, &body.name, body.role)
        .await?;

    sign_in(&session, &user).await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Verify credentials and start a session.
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<CurrentUser>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    sign_in(&session, &user).await?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(user))
}

/// End the session.
async fn logout(session: Session) -> Result<StatusCode> {
    session.flush().await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in user's session snapshot.
async fn me(RequireUser(user): RequireUser) -> Json<CurrentUser> {
    Json(user)
}

/// Store the user in the session, cycling the session ID against fixation.
async fn sign_in(session: &Session, user: &CurrentUser) -> Result<()> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}
