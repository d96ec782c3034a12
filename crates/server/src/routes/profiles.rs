//! Profile routes: view, edit, media upload, authored and liked products.

use axum::extract::{Multipart, Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_sessions::Session;

use shopreel_core::UserId;

use crate::db::products::ProductRepository;
use crate::db::users::{ProfileUpdate, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::product::ProductView;
use crate::models::user::{CurrentUser, Profile, session_keys};
use crate::services::media::{MediaCategory, UploadError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profiles/me", patch(update_me))
        .route("/profiles/me/avatar", post(upload_avatar))
        .route("/profiles/me/cover", post(upload_cover))
        .route("/profiles/{id}", get(show))
        .route("/profiles/{id}/products", get(products))
        .route("/profiles/{id}/liked", get(liked))
}

/// A user's profile and aggregate stats.
async fn show(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Json<Profile>> {
    let profile = UserRepository::new(state.pool())
        .get_profile(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {id}")))?;

    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    name: Option<String>,
    bio: Option<String>,
    avatar_url: Option<String>,
    cover_url: Option<String>,
    website: Option<String>,
    twitter: Option<String>,
    instagram: Option<String>,
    tiktok: Option<String>,
}

/// Edit the signed-in user's profile. Omitted fields are left untouched.
async fn update_me(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    if request
        .name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Err(AppError::BadRequest("name cannot be empty".to_owned()));
    }

    let update = ProfileUpdate {
        name: request.name.map(|n| n.trim().to_owned()),
        bio: request.bio,
        avatar_url: request.avatar_url,
        cover_url: request.cover_url,
        website: request.website,
        twitter: request.twitter,
        instagram: request.instagram,
        tiktok: request.tiktok,
    };

    let profile = UserRepository::new(state.pool())
        .update_profile(user.id, &update)
        .await?;

    refresh_session_user(&session, &user, &profile).await?;
    Ok(Json(profile))
}

/// Upload a new avatar image.
async fn upload_avatar(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    multipart: Multipart,
) -> Result<Json<Profile>> {
    upload_profile_media(&state, &user, &session, multipart, ProfileImage::Avatar).await
}

/// Upload a new cover image.
async fn upload_cover(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    multipart: Multipart,
) -> Result<Json<Profile>> {
    upload_profile_media(&state, &user, &session, multipart, ProfileImage::Cover).await
}

/// Which profile image an upload replaces.
#[derive(Clone, Copy)]
enum ProfileImage {
    Avatar,
    Cover,
}

impl ProfileImage {
    const fn category(self) -> MediaCategory {
        match self {
            Self::Avatar => MediaCategory::Avatars,
            Self::Cover => MediaCategory::Covers,
        }
    }
}

/// Products authored by a user, newest first.
async fn products(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<ProductView>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_creator(id, viewer.map(|u| u.id))
        .await?;

    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// Products a user has liked, most recently liked first.
async fn liked(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<ProductView>>> {
    let products = ProductRepository::new(state.pool())
        .list_liked_by(id, viewer.map(|u| u.id))
        .await?;

    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// Store an uploaded profile image and point the profile at it.
///
/// The previous image is removed afterwards if it lived in our media store;
/// external URLs (placeholder avatars) are left alone.
async fn upload_profile_media(
    state: &AppState,
    user: &CurrentUser,
    session: &Session,
    mut multipart: Multipart,
    image: ProfileImage,
) -> Result<Json<Profile>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(UploadError::from)? {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .ok_or(UploadError::MissingFile)?
                .to_owned();
            let bytes = field.bytes().await.map_err(UploadError::from)?;
            file = Some((content_type, bytes.to_vec()));
        }
    }
    let (content_type, bytes) = file.ok_or(UploadError::MissingFile)?;

    let repo = UserRepository::new(state.pool());
    let previous = repo
        .get_profile(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {}", user.id)))?;

    let stored = state
        .media()
        .store(image.category(), user.id, &content_type, &bytes)
        .await?;

    let update = match image {
        ProfileImage::Avatar => ProfileUpdate {
            avatar_url: Some(stored.public_url.clone()),
            ..ProfileUpdate::default()
        },
        ProfileImage::Cover => ProfileUpdate {
            cover_url: Some(stored.public_url.clone()),
            ..ProfileUpdate::default()
        },
    };

    let profile = match repo.update_profile(user.id, &update).await {
        Ok(profile) => profile,
        Err(e) => {
            if let Err(cleanup) = state.media().remove(&stored.public_url).await {
                tracing::warn!(error = %cleanup, "failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    let old_url = match image {
        ProfileImage::Avatar => Some(previous.avatar_url),
        ProfileImage::Cover => previous.cover_url,
    };
    if let Some(old) = old_url
        && old.starts_with("/media/")
        && old != stored.public_url
    {
        state.media().remove(&old).await?;
    }

    refresh_session_user(session, user, &profile).await?;
    Ok(Json(profile))
}

/// Keep the session snapshot in step with the edited profile.
async fn refresh_session_user(
    session: &Session,
    user: &CurrentUser,
    profile: &Profile,
) -> Result<()> {
    let refreshed = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: profile.name.clone(),
        role: profile.role,
        avatar_url: profile.avatar_url.clone(),
    };
    session
        .insert(session_keys::CURRENT_USER, &refreshed)
        .await?;
    Ok(())
}
