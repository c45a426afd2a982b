use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        ClasseRepository, MongoClasseRepository, MongoQuizRepository, MongoUserRepository,
        QuizRepository, Repositories, UserRepository,
    },
    services::{ClasseService, QuizService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repositories: Repositories,
    pub user_service: Arc<UserService>,
    pub classe_service: Arc<ClasseService>,
    pub quiz_service: Arc<QuizService>,
    pub jwt_service: Arc<JwtService>,
    /// `None` when running on in-memory repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let users = Arc::new(MongoUserRepository::new(&db));
        users.ensure_indexes().await?;
        let classes = Arc::new(MongoClasseRepository::new(&db));
        classes.ensure_indexes().await?;
        let quizzes = Arc::new(MongoQuizRepository::new(&db));
        quizzes.ensure_indexes().await?;

        let repositories = Repositories::new(users, classes, quizzes);
        let mut state = Self::with_repositories(config, repositories);
        state.db = Some(db);
        Ok(state)
    }

    /// Wires the services over arbitrary repository implementations.
    pub fn with_repositories(config: Config, repositories: Repositories) -> Self {
        let user_service = Arc::new(UserService::new(
            Arc::clone(&repositories.users),
            Arc::clone(&repositories.classes),
        ));
        let classe_service = Arc::new(ClasseService::new(
            Arc::clone(&repositories.classes),
            Arc::clone(&repositories.quizzes),
        ));
        let quiz_service = Arc::new(QuizService::new(Arc::clone(&repositories.quizzes)));
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            config: Arc::new(config),
            repositories,
            user_service,
            classe_service,
            quiz_service,
            jwt_service,
            db: None,
        }
    }
}
