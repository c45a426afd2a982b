use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use serde::Serialize;
use thiserror::Error;

use crate::{
    i18n::{MessageKey, Translate, Translator},
    validation::FieldError,
};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Client-facing variants carry an already translated message.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Validation error: {0}")]
    ValidationError(String, Vec<FieldError>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not a teacher of the class: {0}")]
    NotTeacherOfClass(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Membership conflict: {0}")]
    MembershipConflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn client_message(&self) -> String {
        match self {
            AppError::InvalidIdentifier(msg)
            | AppError::ValidationError(msg, _)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotTeacherOfClass(msg)
            | AppError::AlreadyExists(msg)
            | AppError::MembershipConflict(msg) => msg.clone(),
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                Translator::default().translate(MessageKey::InternalError)
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(..) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotTeacherOfClass(_) => StatusCode::FORBIDDEN,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::MembershipConflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }

        let errors = match self {
            AppError::ValidationError(_, fields) => fields.clone(),
            _ => Vec::new(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            status_code: self.status_code().as_u16(),
            message: self.client_message(),
            errors,
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return AppError::AlreadyExists(err.to_string());
        }
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY_CODE,
            ..
        }))
    )
}

pub type AppResult<T> = Result<T, AppError>;
