use std::sync::Arc;

use restaurant_db::AccountStore;

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{CredentialHasher, PasswordError};
use crate::auth::AuthService;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Account persistence (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn AccountStore>,
    /// Immutable server configuration.
    pub config: Arc<ServerConfig>,
    /// Authentication resolver built from `config` over `store`.
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Build the state, deriving the hasher and token issuer from `config`.
    pub fn new(store: Arc<dyn AccountStore>, config: ServerConfig) -> Result<Self, PasswordError> {
        let hasher = CredentialHasher::new(&config.hasher)?;
        let tokens = TokenIssuer::new(&config.jwt);
        let auth = AuthService::new(Arc::clone(&store), hasher, tokens);
        Ok(Self {
            store,
            config: Arc::new(config),
            auth: Arc::new(auth),
        })
    }
}
