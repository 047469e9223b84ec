//! Authentication resolver: credentials to tokens, tokens to accounts.
//!
//! Expected failures (unknown email, wrong password, bad token, vanished
//! account) come back as [`AuthError::Denied`] carrying an [`AuthFailure`]
//! code. Store, hashing and signing faults are separate variants so callers
//! can tell a rejected request from a broken server.

use std::sync::Arc;
use std::time::Duration;

use restaurant_core::types::DbId;
use restaurant_db::models::account::Account;
use restaurant_db::{AccountStore, StatusFilter, StoreError};
use serde::Serialize;

use super::jwt::{Claims, TokenError, TokenIssuer};
use super::password::{CredentialHasher, PasswordError};

/// Expected, client-attributable authentication outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthFailure {
    #[error("User not found")]
    UnknownUser,
    #[error("Wrong password")]
    WrongUserPassword,
    #[error("Token has expired")]
    JwtExpired,
    #[error("Token signature seems invalid or otherwise modified")]
    JwtInvalid,
    #[error("User not found")]
    UserNotFound,
    #[error("An unknown error has occurred. This incident has been reported.")]
    UnknownError,
    #[error("Token is malformed")]
    MalformedToken,
}

impl AuthFailure {
    /// The `errorCode` string clients switch on.
    pub fn code(self) -> &'static str {
        match self {
            AuthFailure::UnknownUser => "UNKNOWN_USER",
            AuthFailure::WrongUserPassword => "WRONG_USER_PASSWORD",
            AuthFailure::JwtExpired => "JWT_EXPIRED",
            AuthFailure::JwtInvalid => "JWT_INVALID",
            AuthFailure::UserNotFound => "USER_NOT_FOUND",
            AuthFailure::UnknownError => "UNKNOWN_ERROR",
            AuthFailure::MalformedToken => "MALFORMED_TOKEN",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Denied(#[from] AuthFailure),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Resolves credentials and bearer tokens against the account store.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    hasher: CredentialHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: CredentialHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Exchange email + password for a fresh token.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        keep_logged_in: bool,
    ) -> Result<String, AuthError> {
        let Some(account) = self
            .store
            .find_by_email(email, StatusFilter::ActiveOnly)
            .await?
        else {
            tracing::info!("Login rejected: unknown or inactive email");
            return Err(AuthFailure::UnknownUser.into());
        };

        let matches = self
            .hasher
            .verify_blocking(password.to_string(), account.password_hash.clone())
            .await?;
        if !matches {
            tracing::warn!(account_id = account.id, "Login rejected: wrong password");
            return Err(AuthFailure::WrongUserPassword.into());
        }

        let token = self.issue(&account, keep_logged_in, None)?;
        tracing::info!(account_id = account.id, keep_logged_in, "Login succeeded");
        Ok(token)
    }

    /// Validate a token and hand back a refreshed one with `keepLoggedIn = true`.
    ///
    /// A malformed token is reported as [`AuthFailure::UnknownError`] and logged.
    pub async fn check_token(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.tokens.verify(token).map_err(|err| match err {
            TokenError::Expired => AuthFailure::JwtExpired,
            TokenError::SignatureInvalid => AuthFailure::JwtInvalid,
            TokenError::Malformed(detail) => {
                tracing::error!(error = %detail, "Token check failed on an undecodable token");
                AuthFailure::UnknownError
            }
        })?;

        let account = self.resolve_claims(&claims).await?;
        let refreshed = self.issue(&account, true, None)?;
        tracing::debug!(account_id = account.id, "Token refreshed");
        Ok(refreshed)
    }

    /// Resolve a bearer token to the live account behind it.
    ///
    /// Used by the guard pipeline on every protected request.
    pub async fn authenticate(&self, token: &str) -> Result<(Account, Claims), AuthError> {
        let claims = self.tokens.verify(token).map_err(|err| match err {
            TokenError::Expired => AuthFailure::JwtExpired,
            TokenError::SignatureInvalid => AuthFailure::JwtInvalid,
            TokenError::Malformed(_) => AuthFailure::MalformedToken,
        })?;
        let account = self.resolve_claims(&claims).await?;
        Ok((account, claims))
    }

    /// Replace an account's password.
    ///
    /// When `old_password` is given it must match the current digest first.
    pub async fn change_password(
        &self,
        account: &Account,
        new_password: &str,
        old_password: Option<&str>,
    ) -> Result<Account, AuthError> {
        if let Some(old_password) = old_password {
            let matches = self
                .hasher
                .verify_blocking(old_password.to_string(), account.password_hash.clone())
                .await?;
            if !matches {
                tracing::warn!(account_id = account.id, "Password change rejected: wrong password");
                return Err(AuthFailure::WrongUserPassword.into());
            }
        }

        let digest = self.hash_password(new_password).await?;
        let updated = self
            .store
            .update_password(account.id, &digest)
            .await?
            .ok_or(AuthFailure::UserNotFound)?;
        tracing::info!(account_id = account.id, "Password changed");
        Ok(updated)
    }

    /// Look up an active account by id, for callers that only hold the id.
    pub async fn find_account(&self, id: DbId) -> Result<Account, AuthError> {
        self.store
            .find_by_id(id, StatusFilter::ActiveOnly)
            .await?
            .ok_or_else(|| AuthFailure::UserNotFound.into())
    }

    /// Hash a plaintext password for storage.
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(self.hasher.hash_blocking(password.to_string()).await?)
    }

    /// Sign a token for `account`.
    pub fn issue(
        &self,
        account: &Account,
        keep_logged_in: bool,
        expiry: Option<Duration>,
    ) -> Result<String, AuthError> {
        Ok(self.tokens.issue(account, keep_logged_in, expiry)?)
    }

    async fn resolve_claims(&self, claims: &Claims) -> Result<Account, AuthError> {
        match self
            .store
            .find_by_id(claims.account_id, StatusFilter::ActiveOnly)
            .await?
        {
            Some(account) => Ok(account),
            None => {
                tracing::info!(account_id = claims.account_id, "Token refers to a missing or inactive account");
                Err(AuthFailure::UserNotFound.into())
            }
        }
    }
}
