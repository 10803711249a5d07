use crate::shared::infrastructure::http::error::ApiError;
use crate::shell::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::Span;

/// Admits the request only for an authenticated caller and hands the resolved
/// `User` to the handlers as a request extension.
pub async fn require_authentication(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let outcome = state.authentication.authenticate(authorization).await;

    match outcome {
        Ok(user) => {
            if let Some(identity) = user.identities.first() {
                Span::current().record(
                    "user",
                    tracing::field::display(format!("{}/{}", identity.subject_id, identity.email)),
                );
            }
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(error) if error.is_credential_failure() => {
            ApiError::Unauthorized(error.to_string()).into_response()
        }
        Err(error) => ApiError::Internal(error.to_string()).into_response(),
    }
}
