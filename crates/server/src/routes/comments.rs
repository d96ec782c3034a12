//! Comment routes: list threads, post comment or reply.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use shopreel_core::{CommentId, ProductId};

use crate::db::RepositoryError;
use crate::db::comments::CommentRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::comment::{AuthorSnapshot, Comment, CommentThread, thread};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/products/{id}/comments", get(list).post(create))
}

/// A product's comments as one-level threads, oldest first.
async fn list(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<CommentThread>>> {
    let comments = CommentRepository::new(state.pool())
        .list_for_product(product_id)
        .await?;

    Ok(Json(thread(comments)))
}

#[derive(Debug, Deserialize)]
struct CreateCommentRequest {
    body: String,
    parent_id: Option<CommentId>,
}

/// Post a comment, or a reply when `parent_id` names a top-level comment.
async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<ProductId>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    let body = request.body.trim();
    if body.is_empty() {
        return Err(AppError::BadRequest("comment body is empty".to_owned()));
    }

    let author = AuthorSnapshot {
        id: user.id,
        name: user.name.clone(),
        avatar_url: user.avatar_url.clone(),
    };

    let comment = CommentRepository::new(state.pool())
        .create(product_id, &author, body, request.parent_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("product or parent comment not found".to_owned())
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(comment)))
}
