#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use classquiz_server::{
    auth::{hash_password, Identity},
    config::Config,
    errors::{AppError, AppResult},
    i18n::Locale,
    models::domain::{Classe, Membership, Question, Quiz, User, UserRole},
    repositories::{ClasseRepository, QuizRepository, Repositories, UserRepository},
};

pub const PASSWORD: &str = "correct horse battery";

pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::AlreadyExists(format!(
                "User '{}' already exists",
                user.username
            )));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_id_and_role(&self, id: &str, role: UserRole) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).filter(|u| u.role == role).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username == login || u.email == login)
            .cloned())
    }

    async fn find_all_paginated(&self, offset: i64, limit: i64) -> AppResult<(Vec<User>, i64)> {
        let users = self.users.read().await;
        let mut items: Vec<_> = users.values().cloned().collect();
        items.sort_by(|a, b| a.username.cmp(&b.username));

        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn update_role(&self, id: &str, role: UserRole) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.users.write().await.remove(id).is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryClasseRepository {
    classes: Arc<RwLock<HashMap<String, Classe>>>,
}

impl InMemoryClasseRepository {
    pub fn new() -> Self {
        Self {
            classes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ClasseRepository for InMemoryClasseRepository {
    async fn create(&self, classe: Classe) -> AppResult<Classe> {
        let mut classes = self.classes.write().await;
        if classes.values().any(|c| c.code == classe.code) {
            return Err(AppError::AlreadyExists(format!(
                "Class code '{}' already exists",
                classe.code
            )));
        }

        classes.insert(classe.id.clone(), classe.clone());
        Ok(classe)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Classe>> {
        Ok(self.classes.read().await.get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Classe>> {
        let classes = self.classes.read().await;
        Ok(classes.values().find(|c| c.code == code).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Classe>> {
        let mut items: Vec<_> = self.classes.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn find_for_member(&self, user_id: &str) -> AppResult<Vec<Classe>> {
        let mut items: Vec<_> = self
            .classes
            .read()
            .await
            .values()
            .filter(|c| c.has_member(user_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn add_member(
        &self,
        classe_id: &str,
        membership: Membership,
        user_id: &str,
    ) -> AppResult<Option<Classe>> {
        let mut classes = self.classes.write().await;
        let Some(classe) = classes.get_mut(classe_id) else {
            return Ok(None);
        };
        if classe.members(membership.other()).iter().any(|id| id == user_id) {
            return Ok(None);
        }

        classe.insert_member(membership, user_id);
        Ok(Some(classe.clone()))
    }

    async fn remove_member(
        &self,
        classe_id: &str,
        membership: Membership,
        user_id: &str,
    ) -> AppResult<Option<Classe>> {
        let mut classes = self.classes.write().await;
        Ok(classes.get_mut(classe_id).map(|classe| {
            classe.remove_member(membership, user_id);
            classe.clone()
        }))
    }

    async fn remove_user_everywhere(&self, user_id: &str) -> AppResult<u64> {
        let mut classes = self.classes.write().await;
        let mut touched = 0;
        for classe in classes.values_mut() {
            let as_student = classe.remove_member(Membership::Student, user_id);
            let as_teacher = classe.remove_member(Membership::Teacher, user_id);
            if as_student || as_teacher {
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn remove_membership_everywhere(
        &self,
        membership: Membership,
        user_id: &str,
    ) -> AppResult<u64> {
        let mut classes = self.classes.write().await;
        let touched = classes
            .values_mut()
            .filter_map(|classe| classe.remove_member(membership, user_id).then_some(()))
            .count();
        Ok(touched as u64)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.classes.write().await.remove(id).is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }

        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn find_by_author(&self, author_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes
            .values()
            .filter(|q| q.is_authored_by(author_id))
            .cloned()
            .collect())
    }

    async fn find_by_classe(&self, classe_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes
            .values()
            .filter(|q| q.is_assigned_to(classe_id))
            .cloned()
            .collect())
    }

    async fn assign_classe(&self, quiz_id: &str, classe_id: &str) -> AppResult<Option<Quiz>> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes.get_mut(quiz_id).map(|quiz| {
            if !quiz.is_assigned_to(classe_id) {
                quiz.class_ids.push(classe_id.to_string());
            }
            quiz.clone()
        }))
    }

    async fn unassign_classe(&self, quiz_id: &str, classe_id: &str) -> AppResult<Option<Quiz>> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes.get_mut(quiz_id).map(|quiz| {
            quiz.class_ids.retain(|id| id != classe_id);
            quiz.clone()
        }))
    }

    async fn detach_classe_everywhere(&self, classe_id: &str) -> AppResult<u64> {
        let mut quizzes = self.quizzes.write().await;
        let mut touched = 0;
        for quiz in quizzes.values_mut() {
            if quiz.is_assigned_to(classe_id) {
                quiz.class_ids.retain(|id| id != classe_id);
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn push_question(&self, quiz_id: &str, question: Question) -> AppResult<Option<Quiz>> {
        let mut quizzes = self.quizzes.write().await;
        Ok(quizzes.get_mut(quiz_id).map(|quiz| {
            quiz.questions.push(question);
            quiz.clone()
        }))
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.quizzes.write().await.remove(id).is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn repositories() -> Repositories {
    Repositories::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryClasseRepository::new()),
        Arc::new(InMemoryQuizRepository::new()),
    )
}

pub fn config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "classquiz-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from("integration_test_secret_key_0123456789".to_string()),
        jwt_expiration_hours: 1,
        default_locale: Locale::En,
        cors_allowed_origin: None,
    }
}

/// Stores a user with `PASSWORD` as password and the given role.
pub async fn seed_user(repositories: &Repositories, username: &str, role: UserRole) -> User {
    let password_hash = hash_password(PASSWORD).unwrap();
    let user = User::new(
        username,
        &format!("{}@example.com", username),
        &password_hash,
        role,
    );
    repositories.users.create(user).await.unwrap()
}

pub async fn seed_classe(repositories: &Repositories, name: &str, code: &str) -> Classe {
    repositories
        .classes
        .create(Classe::new(name, code))
        .await
        .unwrap()
}

pub fn identity_of(user: &User) -> Identity {
    Identity::from(user)
}
