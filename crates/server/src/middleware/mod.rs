//! Request middleware: session layer and authentication extractors.

mod auth;
mod session;

pub use auth::{OptionalUser, RequireSeller, RequireUser};
pub use session::session_layer;
