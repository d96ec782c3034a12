//! API route handlers.
//!
//! All routes are nested under `/api` and return JSON.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/auth/register` | Create account + profile, sign in |
//! | POST | `/auth/login` | Sign in |
//! | POST | `/auth/logout` | Sign out |
//! | GET | `/auth/me` | Current session user |
//! | GET | `/feed` | All products, newest first |
//! | GET | `/products/{id}` | Single product |
//! | POST | `/products` | Seller upload (multipart) |
//! | DELETE | `/products/{id}` | Owner-only delete |
//! | POST | `/products/{id}/like` | Toggle like |
//! | GET | `/products/{id}/share` | Share URL |
//! | GET | `/products/{id}/comments` | Comment threads |
//! | POST | `/products/{id}/comments` | Post comment or reply |
//! | GET | `/cart` | Session cart |
//! | POST | `/cart/items` | Add product to cart |
//! | PATCH | `/cart/items/{product_id}` | Set line quantity |
//! | DELETE | `/cart/items/{product_id}` | Remove line |
//! | POST | `/checkout/intent` | Create payment intent |
//! | POST | `/checkout/complete` | Clear cart after payment |
//! | GET | `/profiles/{id}` | Profile + stats |
//! | PATCH | `/profiles/me` | Edit own profile |
//! | POST | `/profiles/me/avatar` | Upload avatar |
//! | POST | `/profiles/me/cover` | Upload cover image |
//! | GET | `/profiles/{id}/products` | Authored products |
//! | GET | `/profiles/{id}/liked` | Liked products |
//! | GET | `/search?q=` | Product search |

mod auth;
mod cart;
mod checkout;
mod comments;
mod feed;
mod products;
mod profiles;
mod search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(feed::routes())
        .merge(products::routes())
        .merge(comments::routes())
        .merge(cart::routes())
        .merge(checkout::routes())
        .merge(profiles::routes())
        .merge(search::routes())
}
