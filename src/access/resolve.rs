use crate::{
    access::{
        context::{ContextKey, RequestContext, Resolved},
        identifier::parse_identifier,
    },
    errors::{AppError, AppResult},
    i18n::{MessageKey, Translate},
    models::domain::UserRole,
    repositories::Repositories,
};

/// What a path parameter is resolved into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Classe,
    /// A user whose role is Teacher.
    Teacher,
    /// A user whose role is Student.
    Student,
    /// A user of any role.
    User,
    Quiz,
    /// A class looked up by its join code instead of its id.
    ClasseCode,
}

impl Resolution {
    pub fn context_key(&self) -> ContextKey {
        match self {
            Resolution::Classe | Resolution::ClasseCode => ContextKey::Classe,
            Resolution::Teacher => ContextKey::ParamTeacher,
            Resolution::Student => ContextKey::ParamStudent,
            Resolution::User => ContextKey::ParamUser,
            Resolution::Quiz => ContextKey::Quiz,
        }
    }

    fn not_found(&self) -> MessageKey {
        match self {
            Resolution::Classe => MessageKey::ClasseNotFound,
            Resolution::ClasseCode => MessageKey::ClasseCodeNotFound,
            Resolution::Teacher => MessageKey::TeacherNotFound,
            Resolution::Student => MessageKey::StudentNotFound,
            Resolution::User => MessageKey::UserNotFound,
            Resolution::Quiz => MessageKey::QuizNotFound,
        }
    }
}

/// Resolution guard: validates `raw`, performs exactly one store read and
/// returns the context with the entity attached.
///
/// Join codes are validated by the request body rules, every other
/// resolution requires a canonical UUID and never reaches the store
/// otherwise.
pub async fn resolve(
    resolution: Resolution,
    raw: &str,
    ctx: RequestContext,
    repositories: &Repositories,
    translator: &dyn Translate,
) -> AppResult<RequestContext> {
    let key = match resolution {
        Resolution::ClasseCode => raw.to_string(),
        _ => parse_identifier(raw, translator)?,
    };

    let found = match resolution {
        Resolution::Classe => repositories
            .classes
            .find_by_id(&key)
            .await?
            .map(Resolved::Classe),
        Resolution::ClasseCode => repositories
            .classes
            .find_by_code(&key)
            .await?
            .map(Resolved::Classe),
        Resolution::Teacher => repositories
            .users
            .find_by_id_and_role(&key, UserRole::Teacher)
            .await?
            .map(Resolved::Teacher),
        Resolution::Student => repositories
            .users
            .find_by_id_and_role(&key, UserRole::Student)
            .await?
            .map(Resolved::Student),
        Resolution::User => repositories
            .users
            .find_by_id(&key)
            .await?
            .map(Resolved::User),
        Resolution::Quiz => repositories
            .quizzes
            .find_by_id(&key)
            .await?
            .map(Resolved::Quiz),
    };

    match found {
        Some(entity) => Ok(ctx.with_resolved(entity)),
        None => {
            log::debug!(
                "No match for '{}' while resolving {}",
                key,
                resolution.context_key().as_str()
            );
            Err(AppError::NotFound(translator.translate(resolution.not_found())))
        }
    }
}
