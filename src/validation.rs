use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::{
    errors::{AppError, AppResult},
    i18n::{MessageKey, Translate},
};

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("USERNAME_REGEX is a valid regex pattern")
});

static JOIN_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{6}$").expect("JOIN_CODE_REGEX is a valid regex pattern"));

pub const JOIN_CODE_LENGTH: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
}

/// Runs the derived rules of `input` and turns any failure into a translated
/// `ValidationError` carrying one entry per failing rule.
pub fn validate_request<T: Validate>(input: &T, translator: &dyn Translate) -> AppResult<()> {
    input.validate().map_err(|errors| {
        AppError::ValidationError(
            translator.translate(MessageKey::ValidationFailed),
            field_errors(&errors),
        )
    })
}

pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(failures) => {
                out.extend(failures.iter().map(|failure| FieldError {
                    field: path.clone(),
                    code: failure.code.to_string(),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset"))
    }
}

pub fn validate_join_code(value: &str) -> Result<(), ValidationError> {
    if JOIN_CODE_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("join_code_format"))
    }
}

/// Avatar and quiz image references are opaque object-store keys.
pub fn validate_storage_key(value: &str) -> Result<(), ValidationError> {
    let well_formed = !value.is_empty()
        && value.len() <= 255
        && !value.starts_with('/')
        && !value.chars().any(char::is_whitespace)
        && !value.split('/').any(|segment| segment == "..");

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("storage_key_format"))
    }
}
