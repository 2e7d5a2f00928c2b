use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{names, rejections::AppError};

/// The authenticated caller, forwarded by the platform gateway as the
/// `x-user-id` header. Authentication itself happens upstream.
pub struct Caller(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(names::USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .map(Caller)
            .ok_or(AppError::Unauthorized)
    }
}

/// The launch-availability verdict for the requested quiz, evaluated by the
/// authorization collaborator and forwarded as `x-quiz-access: granted`.
/// Absent or any other value means not granted.
pub struct LaunchGrant(pub bool);

impl<S: Send + Sync> FromRequestParts<S> for LaunchGrant {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let granted = parts
            .headers
            .get(names::QUIZ_ACCESS_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == names::QUIZ_ACCESS_GRANTED);
        Ok(LaunchGrant(granted))
    }
}
