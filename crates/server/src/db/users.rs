//! User repository for account and profile database operations.
//!
//! Accounts hold credentials; profiles hold everything user-facing. Queries
//! are runtime-checked with `FromRow` row structs mapped into domain types.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shopreel_core::{Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::user::{Account, Profile};

/// Row shape for `user_account`.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(Account {
            id: UserId::from_uuid(self.id),
            email,
            created_at: self.created_at,
        })
    }
}

/// Row shape for `user_profile`.
#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    name: String,
    role: String,
    bio: String,
    avatar_url: String,
    cover_url: Option<String>,
    website: Option<String>,
    twitter: Option<String>,
    instagram: Option<String>,
    tiktok: Option<String>,
    followers: i64,
    following: i64,
    likes: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            name: row.name,
            role: UserRole::from_db(&row.role),
            bio: row.bio,
            avatar_url: row.avatar_url,
            cover_url: row.cover_url,
            website: row.website,
            twitter: row.twitter,
            instagram: row.instagram,
            tiktok: row.tiktok,
            followers: row.followers,
            following: row.following,
            likes: row.likes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PROFILE_COLUMNS: &str = "user_id, name, role, bio, avatar_url, cover_url, website, \
     twitter, instagram, tiktok, followers, following, likes, created_at, updated_at";

/// Fields a profile edit may change. `None` leaves the column untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
}

/// Repository for account and profile database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an account and its profile in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
        name: &str,
        role: UserRole,
    ) -> Result<(Account, Profile), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let id = Uuid::new_v4();

        let account_row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO user_account (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, created_at
            ",
        )
        .bind(id)
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let profile_row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            INSERT INTO user_profile (user_id, name, role, bio, avatar_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROFILE_COLUMNS}
            ",
        ))
        .bind(id)
        .bind(name)
        .bind(role.as_str())
        .bind(default_bio())
        .bind(Profile::placeholder_avatar(name))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((account_row.into_account()?, profile_row.into()))
    }

    /// Get an account and its password hash by email.
    ///
    /// Returns `None` if no account exists for the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: Uuid,
            email: String,
            password_hash: String,
            created_at: DateTime<Utc>,
        }

        let row = sqlx::query_as::<_, Row>(
            r"
            SELECT id, email, password_hash, created_at
            FROM user_account
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let account = AccountRow {
            id: r.id,
            email: r.email,
            created_at: r.created_at,
        }
        .into_account()?;

        Ok(Some((account, r.password_hash)))
    }

    /// Get a profile by user ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            SELECT {PROFILE_COLUMNS}
            FROM user_profile
            WHERE user_id = $1
            ",
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get an account's profile, creating a default one if it is missing.
    ///
    /// Profiles normally exist from registration; this covers identities
    /// that predate the profile table, mirroring the lazy first-sign-in
    /// creation the client app used to do.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create_profile(
        &self,
        account: &Account,
    ) -> Result<Profile, RepositoryError> {
        if let Some(profile) = self.get_profile(account.id).await? {
            return Ok(profile);
        }

        let name = account.email.local_part().to_owned();
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            INSERT INTO user_profile (user_id, name, role, bio, avatar_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING {PROFILE_COLUMNS}
            ",
        ))
        .bind(account.id.as_uuid())
        .bind(&name)
        .bind(UserRole::Buyer.as_str())
        .bind(default_bio())
        .bind(Profile::placeholder_avatar(&name))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a profile edit, leaving unset fields untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile doesn't exist.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            UPDATE user_profile SET
                name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                avatar_url = COALESCE($4, avatar_url),
                cover_url = COALESCE($5, cover_url),
                website = COALESCE($6, website),
                twitter = COALESCE($7, twitter),
                instagram = COALESCE($8, instagram),
                tiktok = COALESCE($9, tiktok),
                updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            ",
        ))
        .bind(user_id.as_uuid())
        .bind(update.name.as_deref())
        .bind(update.bio.as_deref())
        .bind(update.avatar_url.as_deref())
        .bind(update.cover_url.as_deref())
        .bind(update.website.as_deref())
        .bind(update.twitter.as_deref())
        .bind(update.instagram.as_deref())
        .bind(update.tiktok.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}

/// Default bio for freshly created profiles.
fn default_bio() -> &'static str {
    "New to ShopReel!"
}
