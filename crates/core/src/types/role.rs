//! User role type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role of a ShopReel user.
///
/// Everyone starts as a buyer; sellers additionally get access to the
/// creator upload surface. Stored as lowercase text in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Can browse, like, comment, and buy.
    #[default]
    Buyer,
    /// Can additionally upload and manage products.
    Seller,
}

impl UserRole {
    /// The lowercase database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
        }
    }

    /// Parse the database representation. Unknown values fall back to buyer
    /// rather than failing a whole row read.
    #[must_use]
    pub fn from_db(s: &str) -> Self {
        match s {
            "seller" => Self::Seller,
            _ => Self::Buyer,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UserRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UserRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_db(&s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UserRole {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Seller).unwrap(), "\"seller\"");
        let role: UserRole = serde_json::from_str("\"buyer\"").unwrap();
        assert_eq!(role, UserRole::Buyer);
    }

    #[test]
    fn test_from_db_unknown_defaults_to_buyer() {
        assert_eq!(UserRole::from_db("moderator"), UserRole::Buyer);
        assert_eq!(UserRole::from_db("seller"), UserRole::Seller);
    }
}
