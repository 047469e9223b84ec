//! In-process [`AccountStore`] for tests and local tooling.
//!
//! Mirrors the PostgreSQL semantics that matter to callers: ids are assigned
//! sequentially, email is unique across active and inactive accounts, and
//! deactivation is a status change rather than removal.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use restaurant_core::roles::{AccountStatus, Role};
use restaurant_core::types::DbId;

use crate::models::account::{Account, CreateAccount, UpdateAccount};
use crate::store::{AccountStore, StatusFilter, StoreError};

#[derive(Default)]
struct Inner {
    next_id: DbId,
    accounts: Vec<Account>,
}

#[derive(Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Inner>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        // Poisoning is ignored: every mutation is a single push or field assignment.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn modify(&self, id: DbId, apply: impl FnOnce(&mut Account)) -> Option<Account> {
        let mut inner = self.write();
        let account = inner.accounts.iter_mut().find(|a| a.id == id)?;
        apply(account);
        account.updated_at = Utc::now();
        Some(account.clone())
    }
}

fn visible(account: &Account, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::ActiveOnly => account.is_active(),
        StatusFilter::IncludeInactive => true,
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, input: &CreateAccount) -> Result<Account, StoreError> {
        let mut inner = self.write();
        if inner.accounts.iter().any(|a| a.email == input.email) {
            return Err(StoreError::DuplicateEmail(input.email.clone()));
        }
        inner.next_id += 1;
        let now = Utc::now();
        let account = Account {
            id: inner.next_id,
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        };
        inner.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(
        &self,
        id: DbId,
        filter: StatusFilter,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .read()
            .accounts
            .iter()
            .find(|a| a.id == id && visible(a, filter))
            .cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
        filter: StatusFilter,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .read()
            .accounts
            .iter()
            .find(|a| a.email == email && visible(a, filter))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts = self.read().accounts.clone();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(accounts)
    }

    async fn update_profile(
        &self,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Account>, StoreError> {
        let mut inner = self.write();
        if let Some(email) = &input.email {
            if inner.accounts.iter().any(|a| a.id != id && &a.email == email) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }
        let Some(account) = inner.accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            account.name = name.clone();
        }
        if let Some(email) = &input.email {
            account.email = email.clone();
        }
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn update_role(&self, id: DbId, role: Role) -> Result<Option<Account>, StoreError> {
        Ok(self.modify(id, |account| account.role = role))
    }

    async fn update_password(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self.modify(id, |account| {
            account.password_hash = password_hash.to_string();
        }))
    }

    async fn deactivate(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        Ok(self.modify(id, |account| account.status = AccountStatus::Inactive))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
