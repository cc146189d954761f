use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use session_store::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request has no user id")]
    MissingUser,

    #[error("Application id mismatch: {0}")]
    ApplicationMismatch(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Storage error: {0}")]
    Storage(SessionError),
}

impl From<SessionError> for SkillServerError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(user_id) => Self::SessionNotFound(user_id),
            SessionError::Validation(msg) => Self::InvalidRequest(msg),
            other => Self::Storage(other),
        }
    }
}

impl ResponseError for SkillServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::MissingUser => StatusCode::BAD_REQUEST,
            Self::ApplicationMismatch(_) => StatusCode::FORBIDDEN,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SkillServerError::ApplicationMismatch("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            SkillServerError::from(SessionError::NotFound("u".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SkillServerError::from(SessionError::Validation("empty".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SkillServerError::from(SessionError::StorageError("disk".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
