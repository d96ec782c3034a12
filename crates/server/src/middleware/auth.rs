//! Authentication extractors.
//!
//! Handlers declare their access requirement in the signature:
//! [`RequireUser`] for signed-in endpoints, [`RequireSeller`] for
//! creator-only endpoints, and [`OptionalUser`] for public endpoints whose
//! response varies by viewer (like flags in the feed).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use shopreel_core::UserRole;

use crate::error::AppError;
use crate::models::user::{CurrentUser, session_keys};

async fn session_user(parts: &mut Parts) -> Result<Option<CurrentUser>, AppError> {
    let session = Session::from_request_parts(parts, &())
        .await
        .map_err(|(_, msg)| AppError::Internal(msg.to_owned()))?;
    Ok(session.get(session_keys::CURRENT_USER).await?)
}

/// Extracts the signed-in user, rejecting anonymous requests with 401.
pub struct RequireUser(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_user(parts)
            .await?
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))
    }
}

/// Extracts the signed-in user if there is one.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await?))
    }
}

/// Extracts the signed-in user and requires the seller role.
///
/// Anonymous requests get 401; signed-in buyers get 403.
pub struct RequireSeller(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireSeller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Seller {
            return Err(AppError::Forbidden("seller account required".to_owned()));
        }
        Ok(Self(user))
    }
}
