//! Product search route.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::middleware::OptionalUser;
use crate::models::product::ProductView;
use crate::search::{normalize_query, refilter};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Search products by name or description substring.
///
/// Empty and whitespace-only queries return an empty result without
/// touching the database.
async fn search(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ProductView>>> {
    let Some(query) = normalize_query(&params.q) else {
        return Ok(Json(Vec::new()));
    };

    let candidates = ProductRepository::new(state.pool())
        .search(&query, viewer.map(|u| u.id))
        .await?;
    let matches = refilter(candidates, &query);

    Ok(Json(matches.iter().map(ProductView::from).collect()))
}
