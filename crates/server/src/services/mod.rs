//! Business logic services.
//!
//! Services sit between the route handlers and the repositories or external
//! systems: authentication (password hashing, session identity), the payment
//! gateway client, and the media store.

pub mod auth;
pub mod media;
pub mod payments;
