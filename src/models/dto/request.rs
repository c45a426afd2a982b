use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    models::domain::{Answer, QuizType, UserRole},
    validation::{validate_join_code, validate_storage_key, validate_username},
};

pub const DEFAULT_TIME_LIMIT_SECS: i32 = 20;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50), custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(custom(function = "validate_storage_key"))]
    pub avatar: Option<String>,
}

impl RegisterRequest {
    /// Emails are unique regardless of casing, so they are stored lowercase.
    pub fn normalized(self) -> Self {
        RegisterRequest {
            email: self.email.trim().to_lowercase(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email.
    #[validate(length(min = 1, max = 254))]
    pub login: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

impl LoginRequest {
    /// Usernames never contain `@`, so such a login is an email and gets the
    /// same casing as stored emails.
    pub fn normalized(self) -> Self {
        let login = self.login.trim();
        let login = if login.contains('@') {
            login.to_lowercase()
        } else {
            login.to_string()
        };
        LoginRequest { login, ..self }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClasseRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JoinClasseRequest {
    #[validate(custom(function = "validate_join_code"))]
    pub code: String,
}

impl JoinClasseRequest {
    /// Codes are stored uppercase; accept any casing and stray whitespace.
    pub fn normalized(self) -> Self {
        JoinClasseRequest {
            code: self.code.trim().to_ascii_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    pub quiz_type: QuizType,

    #[validate(custom(function = "validate_storage_key"))]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_has_correct_answer"))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 500))]
    pub prompt: String,

    #[validate(length(min = 2, max = 6), nested)]
    pub answers: Vec<AnswerInput>,

    #[validate(range(min = 5, max = 300))]
    pub time_limit_secs: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerInput {
    #[validate(length(min = 1, max = 200))]
    pub text: String,

    pub correct: bool,
}

impl From<AnswerInput> for Answer {
    fn from(input: AnswerInput) -> Self {
        Answer {
            text: input.text,
            correct: input.correct,
        }
    }
}

fn validate_has_correct_answer(request: &CreateQuestionRequest) -> Result<(), ValidationError> {
    if request.answers.iter().any(|a| a.correct) {
        Ok(())
    } else {
        Err(ValidationError::new("no_correct_answer"))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
