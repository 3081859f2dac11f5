//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use dataguard_shared::AppError;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An `AppError` on its way to the client.
///
/// Renders as `{ "error": <code>, "message": <text> }`. Database and
/// internal errors are logged and replaced by a generic message.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = self.0.error_code().to_ascii_lowercase();

        let message = if self.0.is_client_visible() {
            match &self.0 {
                AppError::Unauthorized(m)
                | AppError::Forbidden(m)
                | AppError::NotFound(m)
                | AppError::Validation(m)
                | AppError::BusinessRule(m)
                | AppError::Conflict(m)
                | AppError::Database(m)
                | AppError::Internal(m) => m.clone(),
            }
        } else {
            error!(error = %self.0, "Request failed");
            "An error occurred".to_string()
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(AppError::NotFound("Vendor not found".into()), StatusCode::NOT_FOUND, "not_found")]
    #[case(AppError::Conflict("in use".into()), StatusCode::CONFLICT, "conflict")]
    #[case(AppError::Validation("bad".into()), StatusCode::BAD_REQUEST, "validation_error")]
    #[case(
        AppError::BusinessRule("locked".into()),
        StatusCode::UNPROCESSABLE_ENTITY,
        "business_rule_violation"
    )]
    #[case(AppError::Forbidden("viewer".into()), StatusCode::FORBIDDEN, "forbidden")]
    #[tokio::test]
    async fn test_client_errors_keep_message(
        #[case] err: AppError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let expected_message = match &err {
            AppError::NotFound(m)
            | AppError::Conflict(m)
            | AppError::Validation(m)
            | AppError::BusinessRule(m)
            | AppError::Forbidden(m) => m.clone(),
            _ => unreachable!(),
        };
        let (actual_status, body) = render(err).await;
        assert_eq!(actual_status, status);
        assert_eq!(body["error"], code);
        assert_eq!(body["message"], expected_message);
    }

    #[tokio::test]
    async fn test_database_error_is_masked() {
        let (status, body) = render(AppError::Database("connection refused".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "database_error");
        assert_eq!(body["message"], "An error occurred");
    }
}
