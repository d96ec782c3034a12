//! Product feed route.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::product::ProductView;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/feed", get(feed))
}

/// All products, newest first, with viewer-dependent like flags.
async fn feed(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
) -> Result<Json<Vec<ProductView>>> {
    let products = ProductRepository::new(state.pool())
        .list_feed(viewer.map(|u| u.id))
        .await?;

    Ok(Json(products.iter().map(ProductView::from).collect()))
}
