//! Account entity model and DTOs.

use restaurant_core::roles::{AccountStatus, Role};
use restaurant_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::store::StoreError;

/// Raw row from the `accounts` table. `role` and `status` are stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user account.
///
/// Contains the password digest -- NEVER serialize this to API responses directly.
/// Use [`AccountResponse`] for external-facing output.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |reason: String| StoreError::CorruptRow { id, reason };
        let role = row.role.parse().map_err(|e| corrupt(format!("{e}")))?;
        let status = row.status.parse().map_err(|e| corrupt(format!("{e}")))?;
        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Safe account representation for API responses (no password digest).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: Timestamp,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            status: account.status,
            created_at: account.created_at,
        }
    }
}

/// DTO for creating a new account. `password_hash` is already a digest.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// DTO for updating profile fields. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn row(role: &str, status: &str) -> AccountRow {
        let now = chrono::Utc::now();
        AccountRow {
            id: 7,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "digest".into(),
            role: role.into(),
            status: status.into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_into_account() {
        let account = Account::try_from(row("ADMIN", "ACTIVE")).unwrap();
        assert_eq!(account.role, Role::Admin);
        assert!(account.is_active());
    }

    #[test]
    fn unknown_role_is_reported_as_corrupt_row() {
        let err = Account::try_from(row("OWNER", "ACTIVE")).unwrap_err();
        assert_matches!(err, StoreError::CorruptRow { id: 7, .. });
    }

    #[test]
    fn response_omits_password_digest() {
        let account = Account::try_from(row("USER", "INACTIVE")).unwrap();
        let json = serde_json::to_value(AccountResponse::from(&account)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["status"], "INACTIVE");
        assert_eq!(json["role"], "USER");
        assert!(json["createdAt"].is_string());
    }
}
