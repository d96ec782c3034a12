//! User domain types.
//!
//! An account is the authentication identity (email + password hash); a
//! profile is everything the rest of the app sees. Profiles are created
//! lazily on first sign-in if registration predates the profile table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopreel_core::{Email, UserId, UserRole};

/// An authentication account (domain type).
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique user ID.
    pub id: UserId,
    /// Account email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A user profile (domain type).
///
/// Aggregate counters (`followers`, `following`, `likes`) are denormalized;
/// `likes` is maintained by the like-toggle transaction in the product
/// repository.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// Owning user ID.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Buyer or seller.
    pub role: UserRole,
    /// Short bio shown on the profile page.
    pub bio: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Cover image URL, if set.
    pub cover_url: Option<String>,
    /// Personal website URL, if set.
    pub website: Option<String>,
    /// Social handles, if set.
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    /// Aggregate follower count.
    pub followers: i64,
    /// Aggregate following count.
    pub following: i64,
    /// Total likes received across the user's products.
    pub likes: i64,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Placeholder avatar for profiles that never uploaded one.
    ///
    /// Same generated-initials service the frontend uses for fallbacks.
    #[must_use]
    pub fn placeholder_avatar(name: &str) -> String {
        let encoded: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_string()
                } else {
                    format!("%{:02X}", u32::from(c) & 0xFF)
                }
            })
            .collect();
        format!("https://ui-avatars.com/api/?name={encoded}&background=random")
    }
}

/// Session-stored user identity.
///
/// This snapshot is denormalized into product and comment author fields, so
/// it carries the display name and avatar alongside the ID. It is refreshed
/// on login and after profile edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name at sign-in time.
    pub name: String,
    /// Buyer or seller.
    pub role: UserRole,
    /// Avatar URL at sign-in time.
    pub avatar_url: String,
}

impl CurrentUser {
    /// Build the session snapshot from an account and its profile.
    #[must_use]
    pub fn from_parts(account: &Account, profile: &Profile) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
            avatar_url: profile.avatar_url.clone(),
        }
    }
}

/// Session keys for data stored in the session record.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the session cart.
    pub const CART: &str = "cart";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_avatar_encodes_name() {
        let url = Profile::placeholder_avatar("Jane Doe");
        assert!(url.starts_with("https://ui-avatars.com/api/?name=Jane%20Doe"));
    }

    #[test]
    fn test_placeholder_avatar_plain_name() {
        let url = Profile::placeholder_avatar("jane");
        assert!(url.contains("name=jane&"));
    }
}
