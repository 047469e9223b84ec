//! Request body extraction with validation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use restaurant_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// JSON body that is deserialized and then checked with [`Validate`].
///
/// Both failure modes (undecodable/missing fields and rule violations)
/// surface as `400 VALIDATION_ERROR` with a `field|reason` message.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<CreateUserRequest>) -> AppResult<()> {
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| CoreError::Validation(rejection_message(&rejection)))?;
        value
            .validate()
            .map_err(|errors| CoreError::Validation(first_violation(&errors)))?;
        Ok(Self(value))
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    format!("body|{}", rejection.body_text())
}

/// Render the first violated rule (by field name) as `field|reason`.
fn first_violation(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let reason = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                (wire_name(&field), reason)
            })
        })
        .collect();
    fields.sort();
    match fields.into_iter().next() {
        Some((field, reason)) => format!("{field}|{reason}"),
        None => "body|invalid request body".to_string(),
    }
}

/// Request DTOs are `rename_all = "camelCase"`; report fields the way the
/// client spelled them.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
