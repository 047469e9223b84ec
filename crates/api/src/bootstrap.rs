//! Startup seeding of the administrator account.

use restaurant_core::roles::Role;
use restaurant_db::models::account::{Account, CreateAccount};
use restaurant_db::StatusFilter;

use crate::auth::AuthError;
use crate::config::BootstrapAdmin;
use crate::state::AppState;

/// Make sure the configured administrator exists and holds the ADMIN role.
///
/// - No account with that email: create it.
/// - Active account with another role: promote it. The password is left alone.
/// - Deactivated account: left untouched and reported.
pub async fn ensure_admin(state: &AppState, admin: &BootstrapAdmin) -> Result<Account, AuthError> {
    let existing = state
        .store
        .find_by_email(&admin.email, StatusFilter::IncludeInactive)
        .await?;

    match existing {
        Some(account) if !account.is_active() => {
            tracing::warn!(account_id = account.id, "Bootstrap admin account is deactivated; not reactivating");
            Ok(account)
        }
        Some(account) if account.role.is_admin() => {
            tracing::debug!(account_id = account.id, "Bootstrap admin already present");
            Ok(account)
        }
        Some(account) => {
            let promoted = state
                .store
                .update_role(account.id, Role::Admin)
                .await?
                .unwrap_or(account);
            tracing::info!(account_id = promoted.id, "Promoted bootstrap account to ADMIN");
            Ok(promoted)
        }
        None => {
            let password_hash = state.auth.hash_password(&admin.password).await?;
            let account = state
                .store
                .create(&CreateAccount {
                    name: admin.name.clone(),
                    email: admin.email.clone(),
                    password_hash,
                    role: Role::Admin,
                })
                .await?;
            tracing::info!(account_id = account.id, "Created bootstrap admin account");
            Ok(account)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use restaurant_db::MemoryAccountStore;

    use super::*;
    use crate::auth::jwt::{parse_expiry, JwtConfig, DEFAULT_TOKEN_EXPIRY};
    use crate::auth::password::HasherConfig;
    use crate::config::ServerConfig;

    fn state() -> AppState {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            jwt: JwtConfig {
                secret: "bootstrap-test-secret".into(),
                default_expiry: parse_expiry(DEFAULT_TOKEN_EXPIRY).unwrap(),
            },
            hasher: HasherConfig {
                enabled: true,
                memory_kib: 1024,
                iterations: 1,
            },
            bootstrap_admin: None,
        };
        AppState::new(Arc::new(MemoryAccountStore::new()), config).unwrap()
    }

    fn admin() -> BootstrapAdmin {
        BootstrapAdmin {
            name: "Root".into(),
            email: "root@example.com".into(),
            password: "rootpassword".into(),
        }
    }

    #[tokio::test]
    async fn creates_missing_admin_with_working_password() {
        let state = state();
        let account = ensure_admin(&state, &admin()).await.unwrap();
        assert_eq!(account.role, Role::Admin);

        let token = state.auth.login("root@example.com", "rootpassword", false).await;
        assert!(token.is_ok());
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let state = state();
        let first = ensure_admin(&state, &admin()).await.unwrap();
        let second = ensure_admin(&state, &admin()).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(state.store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn promotes_existing_user() {
        let state = state();
        let existing = state
            .store
            .create(&CreateAccount {
                name: "Root".into(),
                email: "root@example.com".into(),
                password_hash: "irrelevant".into(),
                role: Role::User,
            })
            .await
            .unwrap();
        let account = ensure_admin(&state, &admin()).await.unwrap();
        assert_eq!(account.id, existing.id);
        assert_eq!(account.role, Role::Admin);
        assert_eq!(account.password_hash, "irrelevant");
    }
}
