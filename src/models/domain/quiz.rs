use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    #[default]
    Classic,
    Survey,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>, // object-store key, never dereferenced here
    #[serde(default)]
    pub quiz_type: QuizType,
    pub author_id: String, // immutable after creation
    #[serde(default)]
    pub class_ids: Vec<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub answers: Vec<Answer>,
    pub time_limit_secs: i32,
    pub order: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub text: String,
    pub correct: bool,
}

impl Quiz {
    pub fn new(title: &str, quiz_type: QuizType, image: Option<String>, author_id: &str) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            image,
            quiz_type,
            author_id: author_id.to_string(),
            class_ids: Vec::new(),
            questions: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    pub fn is_assigned_to(&self, classe_id: &str) -> bool {
        self.class_ids.iter().any(|id| id == classe_id)
    }

    pub fn next_question_order(&self) -> i32 {
        self.questions
            .iter()
            .map(|q| q.order)
            .max()
            .map_or(1, |max| max + 1)
    }
}

impl Question {
    pub fn new(prompt: &str, answers: Vec<Answer>, time_limit_secs: i32, order: i32) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.to_string(),
            answers,
            time_limit_secs,
            order,
        }
    }
}
