use std::sync::Arc;

use rand::Rng;

use crate::{
    auth::Identity,
    errors::{AppError, AppResult},
    i18n::{MessageKey, Translate},
    models::{
        domain::{Classe, Membership, UserRole},
        dto::request::CreateClasseRequest,
    },
    repositories::{ClasseRepository, QuizRepository},
    validation::{validate_request, JOIN_CODE_LENGTH},
};

// No 0/O or 1/I, codes get read aloud in class.
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const JOIN_CODE_ATTEMPTS: usize = 5;

pub fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..JOIN_CODE_LENGTH)
        .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

pub struct ClasseService {
    classes: Arc<dyn ClasseRepository>,
    quizzes: Arc<dyn QuizRepository>,
}

impl ClasseService {
    pub fn new(classes: Arc<dyn ClasseRepository>, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { classes, quizzes }
    }

    /// A teacher creating a class becomes its first teacher; an admin does not.
    pub async fn create(
        &self,
        request: CreateClasseRequest,
        creator: &Identity,
        translator: &dyn Translate,
    ) -> AppResult<Classe> {
        validate_request(&request, translator)?;

        for attempt in 1..=JOIN_CODE_ATTEMPTS {
            let mut classe = Classe::new(request.name.trim(), &generate_join_code());
            if creator.role == UserRole::Teacher {
                classe.insert_member(Membership::Teacher, &creator.id);
            }

            match self.classes.create(classe).await {
                Ok(classe) => {
                    log::info!(
                        "Class {} '{}' created by {}",
                        classe.id,
                        classe.name,
                        creator.id
                    );
                    return Ok(classe);
                }
                Err(AppError::AlreadyExists(reason)) => {
                    log::warn!("Join code collision on attempt {}: {}", attempt, reason);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::InternalError(format!(
            "No unique join code after {} attempts",
            JOIN_CODE_ATTEMPTS
        )))
    }

    /// Admins see every class, everyone else the classes they belong to.
    pub async fn list_for(&self, identity: &Identity) -> AppResult<Vec<Classe>> {
        if identity.is_admin() {
            return self.classes.find_all().await;
        }
        self.classes.find_for_member(&identity.id).await
    }

    /// Idempotent: adding a member already in the set returns the class
    /// unchanged. Adding to one set a user present in the other fails.
    pub async fn add_member(
        &self,
        classe: &Classe,
        membership: Membership,
        user_id: &str,
        translator: &dyn Translate,
    ) -> AppResult<Classe> {
        if classe.members(membership.other()).iter().any(|id| id == user_id) {
            return Err(conflict(membership, translator));
        }
        if classe.members(membership).iter().any(|id| id == user_id) {
            return Ok(classe.clone());
        }

        if let Some(updated) = self
            .classes
            .add_member(&classe.id, membership, user_id)
            .await?
        {
            log::info!(
                "Added {} to {} of class {}",
                user_id,
                membership.field(),
                classe.id
            );
            return Ok(updated);
        }

        // The atomic update matched nothing: the class is gone or the user
        // entered the other set in the meantime.
        match self.classes.find_by_id(&classe.id).await? {
            Some(_) => Err(conflict(membership, translator)),
            None => Err(AppError::NotFound(
                translator.translate(MessageKey::ClasseNotFound),
            )),
        }
    }

    /// Idempotent: removing a non-member is a no-op.
    pub async fn remove_member(
        &self,
        classe: &Classe,
        membership: Membership,
        user_id: &str,
        translator: &dyn Translate,
    ) -> AppResult<Classe> {
        let updated = self
            .classes
            .remove_member(&classe.id, membership, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(translator.translate(MessageKey::ClasseNotFound)))?;

        log::info!(
            "Removed {} from {} of class {}",
            user_id,
            membership.field(),
            classe.id
        );
        Ok(updated)
    }

    pub async fn join(
        &self,
        classe: &Classe,
        student: &Identity,
        translator: &dyn Translate,
    ) -> AppResult<Classe> {
        self.add_member(classe, Membership::Student, &student.id, translator)
            .await
    }

    /// Deletes the class and detaches it from every quiz distributed to it.
    pub async fn delete(&self, classe: &Classe, translator: &dyn Translate) -> AppResult<()> {
        if !self.classes.delete(&classe.id).await? {
            return Err(AppError::NotFound(
                translator.translate(MessageKey::ClasseNotFound),
            ));
        }

        let detached = self.quizzes.detach_classe_everywhere(&classe.id).await?;
        log::info!("Deleted class {} and detached it from {} quizzes", classe.id, detached);
        Ok(())
    }
}

fn conflict(membership: Membership, translator: &dyn Translate) -> AppError {
    let key = match membership {
        Membership::Student => MessageKey::AlreadyTeacherOfClass,
        Membership::Teacher => MessageKey::AlreadyStudentOfClass,
    };
    AppError::MembershipConflict(translator.translate(key))
}
