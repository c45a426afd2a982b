pub mod classe_repository;
pub mod quiz_repository;
pub mod user_repository;

use std::sync::Arc;

pub use classe_repository::{ClasseRepository, MongoClasseRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

/// Store handles shared by the guards and the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub classes: Arc<dyn ClasseRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
}

impl Repositories {
    pub fn new(
        users: Arc<dyn UserRepository>,
        classes: Arc<dyn ClasseRepository>,
        quizzes: Arc<dyn QuizRepository>,
    ) -> Self {
        Self {
            users,
            classes,
            quizzes,
        }
    }
}
