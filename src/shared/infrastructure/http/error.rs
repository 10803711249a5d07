// Wire-level errors. Every handler failure ends up here and is rendered as
// `{"message": ...}` with the matching status code.

use crate::shared::core::application_error::ApplicationError;
use crate::shared::infrastructure::repository::RepositoryError;
use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Message is returned to the caller.
    #[error("{0}")]
    Validation(String),

    /// Undecodable body; detail is only logged.
    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("{0}")]
    NotFound(String),

    #[error("unauthenticated: {0}")]
    Unauthorized(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(message) | ApiError::NotFound(message) => message.clone(),
            ApiError::BadRequest(_) => "Bad Request".into(),
            ApiError::UnsupportedMediaType(_) => "Unsupported Media Type".into(),
            ApiError::Unauthorized(_) => "Authorization needed".into(),
            ApiError::Internal(_) => "Internal Server Error".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let mut response = (
            status,
            Json(ErrorBody {
                message: self.public_message(),
            }),
        )
            .into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Validation(message) => ApiError::Validation(message),
            ApplicationError::NotFound(message) => ApiError::NotFound(message),
            ApplicationError::Domain(rejection) => ApiError::Validation(rejection.to_string()),
            ApplicationError::Repository(RepositoryError::NotFound(message)) => {
                ApiError::NotFound(format!("Not found: {message}"))
            }
            ApplicationError::Repository(error) => ApiError::Internal(error.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        ApplicationError::Repository(error).into()
    }
}

#[cfg(test)]
mod api_error_tests {
    use super::*;
    use crate::modules::time_entries::core::time_entry::TimeEntryRejection;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn render(error: ApiError) -> (StatusCode, ErrorBody, Option<HeaderValue>) {
        let response = error.into_response();
        let status = response.status();
        let challenge = response.headers().get(header::WWW_AUTHENTICATE).cloned();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap(), challenge)
    }

    #[rstest]
    #[tokio::test]
    async fn validation_messages_are_echoed() {
        let (status, body, _) = render(ApiError::Validation("required attribute: name".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "required attribute: name");
    }

    #[rstest]
    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let (status, body, _) = render(ApiError::Internal("disk on fire".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Internal Server Error");
    }

    #[rstest]
    #[tokio::test]
    async fn unauthorized_responses_carry_a_bearer_challenge() {
        let (status, body, challenge) = render(ApiError::Unauthorized("bad signature".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.message, "Authorization needed");
        assert_eq!(challenge, Some(HeaderValue::from_static("Bearer")));
    }

    #[rstest]
    #[case(ApplicationError::Validation("x".into()), StatusCode::BAD_REQUEST)]
    #[case(ApplicationError::NotFound("x".into()), StatusCode::NOT_FOUND)]
    #[case(ApplicationError::Domain(TimeEntryRejection::NothingToStop), StatusCode::BAD_REQUEST)]
    #[case(ApplicationError::Repository(RepositoryError::NotFound("x".into())), StatusCode::NOT_FOUND)]
    #[case(ApplicationError::Repository(RepositoryError::Backend("x".into())), StatusCode::INTERNAL_SERVER_ERROR)]
    fn application_errors_map_to_one_status(
        #[case] error: ApplicationError,
        #[case] expected: StatusCode,
    ) {
        assert_eq!(ApiError::from(error).status(), expected);
    }
}
