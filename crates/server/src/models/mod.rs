//! Domain models for the API server.
//!
//! These types represent validated domain objects separate from database row
//! types, plus the session-held state (current user, cart).

pub mod cart;
pub mod comment;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use comment::{AuthorSnapshot, Comment, CommentThread};
pub use product::{CreatorSnapshot, Product, ProductSnapshot, ProductView};
pub use user::{Account, CurrentUser, Profile, session_keys};
