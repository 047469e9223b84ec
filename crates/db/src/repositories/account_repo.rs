//! Repository for the `accounts` table.

use async_trait::async_trait;
use restaurant_core::roles::{AccountStatus, Role};
use restaurant_core::types::DbId;
use sqlx::PgPool;

use crate::models::account::{Account, AccountRow, CreateAccount, UpdateAccount};
use crate::store::{AccountStore, StatusFilter, StoreError};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, status, created_at, updated_at";

/// Unique constraint guarding `accounts.email`.
const EMAIL_CONSTRAINT: &str = "uq_accounts_email";

/// Provides CRUD operations for accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a new account, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Account, StoreError> {
        let query = format!(
            "INSERT INTO accounts (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
            .map_err(|e| map_unique_violation(e, &input.email))?;
        row.try_into()
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        filter: StatusFilter,
    ) -> Result<Option<Account>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts WHERE id = $1 AND ($2::text IS NULL OR status = $2)"
        );
        sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .bind(status_bind(filter))
            .fetch_optional(pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
        filter: StatusFilter,
    ) -> Result<Option<Account>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts WHERE email = $1 AND ($2::text IS NULL OR status = $2)"
        );
        sqlx::query_as::<_, AccountRow>(&query)
            .bind(email)
            .bind(status_bind(filter))
            .fetch_optional(pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    /// List all accounts ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Account>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM accounts ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, AccountRow>(&query)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, StoreError> {
        let query = format!(
            "UPDATE accounts SET
                name = COALESCE($2, name),
                email = COALESCE($3, email)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let email = input.email.clone().unwrap_or_default();
        sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_unique_violation(e, &email))?
            .map(Account::try_from)
            .transpose()
    }

    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: Role,
    ) -> Result<Option<Account>, StoreError> {
        let query = format!("UPDATE accounts SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    /// Replace the stored password digest.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<Option<Account>, StoreError> {
        let query =
            format!("UPDATE accounts SET password_hash = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .bind(password_hash)
            .fetch_optional(pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    /// Soft-deactivate an account by setting `status = 'INACTIVE'`.
    ///
    /// Deactivating an already inactive account is a no-op that still returns the row.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<Option<Account>, StoreError> {
        let query = format!("UPDATE accounts SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .bind(AccountStatus::Inactive.as_str())
            .fetch_optional(pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }
}

fn status_bind(filter: StatusFilter) -> Option<&'static str> {
    match filter {
        StatusFilter::ActiveOnly => Some(AccountStatus::Active.as_str()),
        StatusFilter::IncludeInactive => None,
    }
}

/// Turn a unique violation on `uq_accounts_email` (SQLSTATE 23505) into
/// [`StoreError::DuplicateEmail`]; everything else stays a database error.
fn map_unique_violation(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(EMAIL_CONSTRAINT)
        {
            return StoreError::DuplicateEmail(email.to_string());
        }
    }
    StoreError::Database(err)
}

/// [`AccountStore`] backed by PostgreSQL through [`AccountRepo`].
#[derive(Clone)]
pub struct PgAccountStore {
    pool: DbPool,
}

impl PgAccountStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, input: &CreateAccount) -> Result<Account, StoreError> {
        AccountRepo::create(&self.pool, input).await
    }

    async fn find_by_id(
        &self,
        id: DbId,
        filter: StatusFilter,
    ) -> Result<Option<Account>, StoreError> {
        AccountRepo::find_by_id(&self.pool, id, filter).await
    }

    async fn find_by_email(
        &self,
        email: &str,
        filter: StatusFilter,
    ) -> Result<Option<Account>, StoreError> {
        AccountRepo::find_by_email(&self.pool, email, filter).await
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        AccountRepo::list(&self.pool).await
    }

    async fn update_profile(
        &self,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, StoreError> {
        AccountRepo::update_profile(&self.pool, id, input).await
    }

    async fn update_role(&self, id: DbId, role: Role) -> Result<Option<Account>, StoreError> {
        AccountRepo::update_role(&self.pool, id, role).await
    }

    async fn update_password(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<Option<Account>, StoreError> {
        AccountRepo::update_password(&self.pool, id, password_hash).await
    }

    async fn deactivate(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        AccountRepo::deactivate(&self.pool, id).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
