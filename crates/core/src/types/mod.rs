//! Core types for ShopReel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod media;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use media::{MediaError, MediaKind};
pub use price::{CurrencyCode, Price, PriceError};
pub use role::UserRole;
