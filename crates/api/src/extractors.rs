//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;
use dataguard_shared::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON and failed rules both become `400` responses with the
/// usual `{ "error", "message" }` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ApiError(AppError::Validation(rejection.body_text()))
            })?;
        value
            .validate()
            .map_err(|errors| ApiError(AppError::Validation(describe(&errors))))?;
        Ok(Self(value))
    }
}

/// Flattens validation errors into `field: message` pairs.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string);
                format!("{field}: {message}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Body {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(email)]
        contact_email: Option<String>,
    }

    #[test]
    fn test_describe_lists_every_field() {
        let body = Body {
            name: String::new(),
            contact_email: Some("nope".to_string()),
        };
        let errors = body.validate().unwrap_err();
        assert_eq!(describe(&errors), "contact_email: email; name: must not be empty");
    }
}
