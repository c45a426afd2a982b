use std::sync::Arc;

use crate::{
    auth::{hash_password, verify_password, Identity},
    errors::{AppError, AppResult},
    i18n::{MessageKey, Translate},
    models::{
        domain::{Membership, User, UserRole},
        dto::{
            request::{LoginRequest, PaginationParams, RegisterRequest},
            response::{PaginatedResponse, UserDto},
        },
    },
    repositories::{ClasseRepository, UserRepository},
    validation::validate_request,
};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    classes: Arc<dyn ClasseRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, classes: Arc<dyn ClasseRepository>) -> Self {
        Self { users, classes }
    }

    /// New accounts always start with the default role.
    pub async fn register(
        &self,
        request: RegisterRequest,
        translator: &dyn Translate,
    ) -> AppResult<User> {
        let request = request.normalized();
        validate_request(&request, translator)?;

        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(AppError::AlreadyExists(
                translator.translate(MessageKey::UsernameTaken),
            ));
        }
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::AlreadyExists(
                translator.translate(MessageKey::EmailTaken),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let mut user = User::new(
            &request.username,
            &request.email,
            &password_hash,
            UserRole::default(),
        );
        user.avatar = request.avatar;

        let user = match self.users.create(user).await {
            Ok(user) => user,
            // Lost a race against a concurrent registration.
            Err(AppError::AlreadyExists(_)) => {
                let key = if self.users.find_by_email(&request.email).await?.is_some() {
                    MessageKey::EmailTaken
                } else {
                    MessageKey::UsernameTaken
                };
                return Err(AppError::AlreadyExists(translator.translate(key)));
            }
            Err(other) => return Err(other),
        };

        log::info!("Registered user '{}' ({})", user.username, user.id);
        Ok(user)
    }

    /// Unknown login and wrong password answer the same way.
    pub async fn login(&self, request: LoginRequest, translator: &dyn Translate) -> AppResult<User> {
        let request = request.normalized();
        validate_request(&request, translator)?;

        let invalid = || AppError::Unauthorized(translator.translate(MessageKey::InvalidCredentials));

        let user = self
            .users
            .find_by_login(&request.login)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash)? {
            log::debug!("Wrong password for user {}", user.id);
            return Err(invalid());
        }

        Ok(user)
    }

    pub async fn get_current(
        &self,
        identity: &Identity,
        translator: &dyn Translate,
    ) -> AppResult<User> {
        self.users
            .find_by_id(&identity.id)
            .await?
            .ok_or_else(|| AppError::NotFound(translator.translate(MessageKey::UserNotFound)))
    }

    pub async fn list(&self, pagination: &PaginationParams) -> AppResult<PaginatedResponse<UserDto>> {
        let (users, total) = self
            .users
            .find_all_paginated(pagination.offset(), pagination.limit())
            .await?;

        Ok(PaginatedResponse {
            items: users.into_iter().map(UserDto::from).collect(),
            total,
            offset: pagination.offset(),
            limit: pagination.limit(),
        })
    }

    /// Also pulls the user out of every membership set the new role no
    /// longer fits, so a promoted student is not left in `student_ids`.
    pub async fn change_role(
        &self,
        user: &User,
        role: UserRole,
        translator: &dyn Translate,
    ) -> AppResult<User> {
        let updated = self
            .users
            .update_role(&user.id, role)
            .await?
            .ok_or_else(|| AppError::NotFound(translator.translate(MessageKey::UserNotFound)))?;

        for membership in [Membership::Student, Membership::Teacher] {
            if membership.admits(role) {
                continue;
            }
            let touched = self
                .classes
                .remove_membership_everywhere(membership, &user.id)
                .await?;
            if touched > 0 {
                log::info!(
                    "Removed user {} from {} in {} classes",
                    user.id,
                    membership.field(),
                    touched
                );
            }
        }

        log::info!("Role of user {} changed from {} to {}", user.id, user.role, role);
        Ok(updated)
    }

    /// Deletes the account and drops it from every class it belonged to.
    pub async fn delete(&self, user: &User, translator: &dyn Translate) -> AppResult<()> {
        if !self.users.delete(&user.id).await? {
            return Err(AppError::NotFound(
                translator.translate(MessageKey::UserNotFound),
            ));
        }

        let touched = self.classes.remove_user_everywhere(&user.id).await?;
        log::info!("Deleted user {} and removed it from {} classes", user.id, touched);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        i18n::Translator,
        repositories::{classe_repository::MockClasseRepository, user_repository::MockUserRepository},
    };
    use mockall::predicate::eq;

    fn service(users: MockUserRepository, classes: MockClasseRepository) -> UserService {
        UserService::new(Arc::new(users), Arc::new(classes))
    }

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "correct horse battery".to_string(),
            avatar: None,
        }
    }

    /// Both pre-checks pass, then `create` hits a unique index. The second
    /// email lookup reports whether the email was the colliding field.
    fn racing_users(email_taken_meanwhile: bool) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::AlreadyExists("E11000 duplicate key".to_string())));

        let mut lookups = 0;
        users
            .expect_find_by_email()
            .with(eq("race@example.com"))
            .times(2)
            .returning(move |_| {
                lookups += 1;
                let taken = lookups > 1 && email_taken_meanwhile;
                Ok(taken.then(|| User::test_user("other", UserRole::Student)))
            });
        users
    }

    #[tokio::test]
    async fn test_lost_race_on_email_reports_email_taken() {
        let result = service(racing_users(true), MockClasseRepository::new())
            .register(register_request("racer", "Race@Example.com"), &Translator::default())
            .await;

        match result {
            Err(AppError::AlreadyExists(msg)) => assert_eq!(msg, "This email is already in use"),
            other => panic!("Expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lost_race_on_username_reports_username_taken() {
        let result = service(racing_users(false), MockClasseRepository::new())
            .register(register_request("racer", "race@example.com"), &Translator::default())
            .await;

        match result {
            Err(AppError::AlreadyExists(msg)) => {
                assert_eq!(msg, "This username is already taken")
            }
            other => panic!("Expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_promotion_to_teacher_leaves_student_sets() {
        let student = User::test_user("pupil", UserRole::Student);
        let id = student.id.clone();

        let mut users = MockUserRepository::new();
        let promoted = User {
            role: UserRole::Teacher,
            ..student.clone()
        };
        users
            .expect_update_role()
            .with(eq(id.clone()), eq(UserRole::Teacher))
            .times(1)
            .returning(move |_, _| Ok(Some(promoted.clone())));

        let mut classes = MockClasseRepository::new();
        classes
            .expect_remove_membership_everywhere()
            .with(eq(Membership::Student), eq(id))
            .times(1)
            .returning(|_, _| Ok(2));

        let updated = service(users, classes)
            .change_role(&student, UserRole::Teacher, &Translator::default())
            .await
            .unwrap();

        assert_eq!(updated.role, UserRole::Teacher);
    }

    #[tokio::test]
    async fn test_role_without_membership_leaves_both_sets() {
        let teacher = User::test_user("teacher", UserRole::Teacher);
        let id = teacher.id.clone();

        let mut users = MockUserRepository::new();
        let customer = User {
            role: UserRole::Customer,
            ..teacher.clone()
        };
        users
            .expect_update_role()
            .times(1)
            .returning(move |_, _| Ok(Some(customer.clone())));

        let mut classes = MockClasseRepository::new();
        classes
            .expect_remove_membership_everywhere()
            .with(eq(Membership::Student), eq(id.clone()))
            .times(1)
            .returning(|_, _| Ok(0));
        classes
            .expect_remove_membership_everywhere()
            .with(eq(Membership::Teacher), eq(id))
            .times(1)
            .returning(|_, _| Ok(1));

        service(users, classes)
            .change_role(&teacher, UserRole::Customer, &Translator::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_role_change_of_missing_user_touches_no_class() {
        let ghost = User::test_user("ghost", UserRole::Student);

        let mut users = MockUserRepository::new();
        users.expect_update_role().returning(|_, _| Ok(None));
        let mut classes = MockClasseRepository::new();
        classes.expect_remove_membership_everywhere().never();

        let result = service(users, classes)
            .change_role(&ghost, UserRole::Teacher, &Translator::default())
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
