use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Question, Quiz, QuizType, User, UserRole};

/// Public view of a user. Has no password field by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

/// A quiz as class members see it: questions without the answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberQuizDto {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quiz_type: QuizType,
    pub author_id: String,
    pub questions: Vec<MemberQuestionDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberQuestionDto {
    pub id: String,
    pub prompt: String,
    pub answers: Vec<MemberAnswerDto>,
    pub time_limit_secs: i32,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberAnswerDto {
    pub text: String,
}

impl From<Quiz> for MemberQuizDto {
    fn from(quiz: Quiz) -> Self {
        MemberQuizDto {
            id: quiz.id,
            title: quiz.title,
            image: quiz.image,
            quiz_type: quiz.quiz_type,
            author_id: quiz.author_id,
            questions: quiz.questions.into_iter().map(MemberQuestionDto::from).collect(),
        }
    }
}

impl From<Question> for MemberQuestionDto {
    fn from(question: Question) -> Self {
        MemberQuestionDto {
            id: question.id,
            prompt: question.prompt,
            answers: question
                .answers
                .into_iter()
                .map(|answer| MemberAnswerDto { text: answer.text })
                .collect(),
            time_limit_secs: question.time_limit_secs,
            order: question.order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
