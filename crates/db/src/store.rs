//! The account storage seam.
//!
//! The API only ever talks to `dyn AccountStore`, so the same handlers run
//! over PostgreSQL in production and over [`crate::MemoryAccountStore`] in tests.

use async_trait::async_trait;
use restaurant_core::roles::Role;
use restaurant_core::types::DbId;

use crate::models::account::{Account, CreateAccount, UpdateAccount};

/// Which lifecycle states a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Only `ACTIVE` accounts. Every authentication lookup uses this.
    ActiveOnly,
    /// Soft-deleted accounts are returned as well.
    IncludeInactive,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("an account with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("account row {id} is corrupt: {reason}")]
    CorruptRow { id: DbId, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new `ACTIVE` account.
    async fn create(&self, input: &CreateAccount) -> Result<Account, StoreError>;

    async fn find_by_id(
        &self,
        id: DbId,
        filter: StatusFilter,
    ) -> Result<Option<Account>, StoreError>;

    /// Exact (case-sensitive) email match.
    async fn find_by_email(
        &self,
        email: &str,
        filter: StatusFilter,
    ) -> Result<Option<Account>, StoreError>;

    /// All accounts, newest first, including inactive ones.
    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    /// Apply non-`None` profile fields. Returns `None` if the id does not exist.
    async fn update_profile(
        &self,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, StoreError>;

    async fn update_role(&self, id: DbId, role: Role) -> Result<Option<Account>, StoreError>;

    async fn update_password(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Soft-delete: set status to `INACTIVE`. Returns `None` if the id does not exist.
    async fn deactivate(&self, id: DbId) -> Result<Option<Account>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
