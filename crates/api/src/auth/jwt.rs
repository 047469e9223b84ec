//! Session token issuance and verification.
//!
//! Tokens are HS256-signed JWTs in compact `header.payload.signature` form
//! carrying a [`Claims`] payload. They are never stored server-side: a token
//! is valid exactly as long as its signature checks out and `exp` has not
//! been reached. There is no revocation short of waiting out the expiry.

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use restaurant_core::roles::Role;
use restaurant_core::types::DbId;
use restaurant_db::models::account::Account;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Expiry used when `DEFAULT_TOKEN_EXPIRATION_INTERVAL` is not set.
pub const DEFAULT_TOKEN_EXPIRY: &str = "2d";

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// The account's internal database id.
    pub account_id: DbId,
    pub role: Role,
    /// "Stay signed in" flag chosen at login; always `true` after a refresh.
    pub keep_logged_in: bool,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier (UUID v4) for audit logs.
    pub jti: String,
}

/// Why a token failed verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Tampered payload, wrong key, or unexpected algorithm.
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// Correctly signed, but `exp` has been reached.
    #[error("token has expired")]
    Expired,

    /// Not a decodable JWT at all (bad segments, base64, JSON, missing claims).
    #[error("token is malformed: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::ImmatureSignature => TokenError::SignatureInvalid,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Configuration for token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Lifetime applied when `issue` is not given an explicit expiry.
    pub default_expiry: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("default_expiry", &self.default_expiry)
            .finish()
    }
}

/// Parse an expiry interval such as `"2d"`, `"12h"`, `"30m"` or `"1s"`.
///
/// A bare integer is a number of seconds.
pub fn parse_expiry(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| format!("invalid expiry '{value}': {e}"));
    }
    let parsed =
        humantime::parse_duration(value).map_err(|e| format!("invalid expiry '{value}': {e}"))?;
    if parsed.is_zero() {
        return Err(format!("invalid expiry '{value}': must be greater than zero"));
    }
    Ok(parsed)
}

/// Signs and verifies session tokens with a process-wide key.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_expiry: Duration,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // `exp` must be present, but is compared strictly in `verify`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            default_expiry: config.default_expiry,
        }
    }

    /// Issue a token for `account`, valid for `expiry` or the configured default.
    pub fn issue(
        &self,
        account: &Account,
        keep_logged_in: bool,
        expiry: Option<Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let lifetime = expiry.unwrap_or(self.default_expiry);
        let now = chrono::Utc::now().timestamp();
        let lifetime_secs = i64::try_from(lifetime.as_millis().div_ceil(1000)).unwrap_or(i64::MAX);

        let claims = Claims {
            account_id: account.id,
            role: account.role,
            keep_logged_in,
            iat: now,
            exp: now.saturating_add(lifetime_secs),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verify signature and expiry, returning the embedded [`Claims`].
    ///
    /// The signature is checked first, so a token signed with another key is
    /// always [`TokenError::SignatureInvalid`] regardless of its expiry. A token
    /// is expired as soon as the current time reaches `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        if data.claims.exp <= chrono::Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use restaurant_core::roles::AccountStatus;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    pub(crate) fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(&JwtConfig {
            secret: SECRET.to_string(),
            default_expiry: Duration::from_secs(2 * 24 * 60 * 60),
        })
    }

    fn account(id: DbId, role: Role) -> Account {
        let now = chrono::Utc::now();
        Account {
            id,
            name: "Token Test".into(),
            email: format!("user{id}@test.com"),
            password_hash: "digest".into(),
            role,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sign arbitrary claims, bypassing `issue`.
    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let issuer = test_issuer();
        let token = issuer.issue(&account(42, Role::Admin), false, None).unwrap();

        let claims = issuer.verify(&token).expect("token should verify");
        assert_eq!(claims.account_id, 42);
        assert_eq!(claims.role, Role::Admin);
        assert!(!claims.keep_logged_in);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_default_expiry_applies_when_none_given() {
        let issuer = test_issuer();
        let token = issuer.issue(&account(1, Role::User), true, None).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 2 * 24 * 60 * 60);
    }

    #[test]
    fn test_explicit_expiry_overrides_default() {
        let issuer = test_issuer();
        let token = issuer
            .issue(&account(1, Role::User), true, Some(Duration::from_secs(90)))
            .unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 90);
    }

    #[test]
    fn test_one_second_token_expires() {
        let issuer = test_issuer();
        let token = issuer
            .issue(&account(1, Role::User), false, Some(Duration::from_secs(1)))
            .unwrap();

        std::thread::sleep(Duration::from_millis(1010));

        assert_matches!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_already_expired_token_fails() {
        let issuer = test_issuer();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            account_id: 1,
            role: Role::User,
            keep_logged_in: false,
            iat: now - 600,
            exp: now - 300,
            jti: Uuid::new_v4().to_string(),
        };
        assert_matches!(issuer.verify(&sign(&claims, SECRET)), Err(TokenError::Expired));
    }

    #[test]
    fn test_different_secret_is_signature_invalid() {
        let other = TokenIssuer::new(&JwtConfig {
            secret: "secret-bravo".to_string(),
            default_expiry: Duration::from_secs(60),
        });
        let token = other.issue(&account(1, Role::User), false, None).unwrap();

        assert_matches!(test_issuer().verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_wrong_secret_beats_expiry() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            account_id: 1,
            role: Role::User,
            keep_logged_in: false,
            iat: now - 600,
            exp: now - 300,
            jti: Uuid::new_v4().to_string(),
        };
        let token = sign(&claims, "some-other-secret");
        assert_matches!(test_issuer().verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_tampered_payload_is_signature_invalid() {
        let issuer = test_issuer();
        let user_token = issuer.issue(&account(2, Role::User), false, None).unwrap();
        let admin_token = issuer.issue(&account(1, Role::Admin), false, None).unwrap();

        // Graft the admin payload onto the user's signature.
        let user_parts: Vec<&str> = user_token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

        assert_matches!(issuer.verify(&forged), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let issuer = test_issuer();
        assert_matches!(issuer.verify(""), Err(TokenError::Malformed(_)));
        assert_matches!(issuer.verify("not-a-jwt"), Err(TokenError::Malformed(_)));
        assert_matches!(issuer.verify("a.b.c"), Err(TokenError::Malformed(_)));
    }

    #[test]
    fn test_wire_format() {
        let issuer = test_issuer();
        let token = issuer.issue(&account(5, Role::User), true, None).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);

        let mut insecure = Validation::new(Algorithm::HS256);
        insecure.insecure_disable_signature_validation();
        let payload = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"unused"),
            &insecure,
        )
        .unwrap()
        .claims;
        assert_eq!(payload["accountId"], 5);
        assert_eq!(payload["role"], "USER");
        assert_eq!(payload["keepLoggedIn"], true);
        assert!(payload["exp"].is_i64());
    }

    #[test]
    fn test_parse_expiry() {
        assert_eq!(parse_expiry("2d").unwrap(), Duration::from_secs(172_800));
        assert_eq!(parse_expiry("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_expiry("12h").unwrap(), Duration::from_secs(43_200));
        assert_eq!(parse_expiry("90").unwrap(), Duration::from_secs(90));
        assert!(parse_expiry("").is_err());
        assert!(parse_expiry("soon").is_err());
        assert!(parse_expiry("0s").is_err());
    }
}
