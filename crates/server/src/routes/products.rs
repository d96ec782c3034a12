//! Product routes: detail, upload, delete, like toggle, share URL.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};

use shopreel_core::{MediaKind, Price, ProductId};

use crate::db::RepositoryError;
use crate::db::products::{NewProduct, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, RequireSeller, RequireUser};
use crate::models::product::{CreatorSnapshot, ProductView};
use crate::services::media::{MediaCategory, UploadError};
use crate::state::AppState;

/// Upload body limit: the 50 MiB video cap plus form-field headroom.
const UPLOAD_BODY_LIMIT: usize = 52 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            post(create).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/products/{id}", get(show).delete(delete))
        .route("/products/{id}/like", post(like))
        .route("/products/{id}/share", get(share))
}

/// Single product, with viewer-dependent like flag.
async fn show(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = ProductRepository::new(state.pool())
        .get(id, viewer.map(|u| u.id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(ProductView::from(&product)))
}

/// Collected multipart fields for a product upload.
#[derive(Default)]
struct UploadForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    sale_price: Option<String>,
    media: Option<(String, Vec<u8>)>,
}

/// Seller-only product upload (multipart form).
///
/// Everything is validated before the file touches disk; if the database
/// insert fails afterwards, the stored file is removed rather than left
/// orphaned.
async fn create(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProductView>)> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(UploadError::from)? {
        match field.name().unwrap_or_default() {
            "name" => form.name = Some(field.text().await.map_err(UploadError::from)?),
            "description" => {
                form.description = Some(field.text().await.map_err(UploadError::from)?);
            }
            "price" => form.price = Some(field.text().await.map_err(UploadError::from)?),
            "sale_price" => {
                form.sale_price = Some(field.text().await.map_err(UploadError::from)?);
            }
            "media" => {
                let content_type = field
                    .content_type()
                    .ok_or(UploadError::MissingFile)?
                    .to_owned();
                let bytes = field.bytes().await.map_err(UploadError::from)?;
                form.media = Some((content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let name = required_text(form.name, "name")?;
    let description = required_text(form.description, "description")?;
    let price = parse_price(&required_text(form.price, "price")?)?;
    let sale_price = match form.sale_price.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_price(raw)?),
    };
    let (content_type, bytes) = form.media.ok_or(UploadError::MissingFile)?;

    // Validate media before writing anything
    MediaKind::validate(&content_type, bytes.len() as u64).map_err(UploadError::from)?;

    let stored = state
        .media()
        .store(MediaCategory::Products, user.id, &content_type, &bytes)
        .await?;

    let created = ProductRepository::new(state.pool())
        .create(NewProduct {
            creator: CreatorSnapshot {
                id: user.id,
                name: user.name.clone(),
                avatar_url: user.avatar_url.clone(),
            },
            media_url: stored.public_url.clone(),
            media_kind: stored.kind,
            name,
            description,
            price,
            sale_price,
        })
        .await;

    let product = match created {
        Ok(product) => product,
        Err(e) => {
            if let Err(cleanup) = state.media().remove(&stored.public_url).await {
                tracing::warn!(error = %cleanup, "failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    tracing::info!(product_id = %product.id, creator_id = %user.id, "product created");
    Ok((StatusCode::CREATED, Json(ProductView::from(&product))))
}

/// Owner-only product delete. Also removes the stored media file.
async fn delete(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let repo = ProductRepository::new(state.pool());

    let Some(media_url) = repo.delete(id, user.id).await? else {
        // Distinguish "not yours" from "gone"
        return if repo.get(id, None).await?.is_some() {
            Err(AppError::Forbidden("not your product".to_owned()))
        } else {
            Err(AppError::NotFound(format!("product {id}")))
        };
    };

    state.media().remove(&media_url).await?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct LikeResponse {
    liked: bool,
    like_count: i64,
}

/// Toggle the signed-in user's like. Returns the authoritative count.
async fn like(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<ProductId>,
) -> Result<Json<LikeResponse>> {
    let outcome = ProductRepository::new(state.pool())
        .toggle_like(id, user.id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("product {id}")),
            other => other.into(),
        })?;

    Ok(Json(LikeResponse {
        liked: outcome.liked,
        like_count: outcome.like_count,
    }))
}

/// Share URL for a product, pointing at the frontend's product page.
async fn share(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Json<Value>> {
    ProductRepository::new(state.pool())
        .get(id, None)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let base = state.config().base_url.trim_end_matches('/');
    Ok(Json(json!({ "url": format!("{base}/product/{id}") })))
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(UploadError::MissingField(field).into());
    }
    Ok(trimmed.to_owned())
}

fn parse_price(raw: &str) -> Result<Price> {
    Price::parse_usd(raw).map_err(|e| AppError::BadRequest(format!("invalid price: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_missing_and_blank() {
        assert!(required_text(None, "name").is_err());
        assert!(required_text(Some(String::new()), "name").is_err());
        assert!(required_text(Some("   ".to_string()), "name").is_err());
    }

    #[test]
    fn test_required_text_trims() {
        assert_eq!(
            required_text(Some("  Shirt  ".to_string()), "name").unwrap(),
            "Shirt"
        );
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("19.99").unwrap().display(), "$19.99");
        assert!(parse_price("0").is_err());
        assert!(parse_price("free").is_err());
    }
}
