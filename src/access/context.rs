use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::ACCEPT_LANGUAGE, web, FromRequest, HttpMessage, HttpRequest};

use crate::{
    app_state::AppState,
    auth::Identity,
    errors::{AppError, AppResult},
    i18n::{Locale, MessageKey, Translate, Translator},
    models::domain::{Classe, Quiz, User},
};

/// Well-known names under which guards publish what they resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextKey {
    User,
    Classe,
    ParamTeacher,
    ParamStudent,
    ParamUser,
    Quiz,
}

impl ContextKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::User => "user",
            ContextKey::Classe => "classe",
            ContextKey::ParamTeacher => "paramTeacher",
            ContextKey::ParamStudent => "paramStudent",
            ContextKey::ParamUser => "paramUser",
            ContextKey::Quiz => "quiz",
        }
    }
}

/// An entity produced by a resolution guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    Classe(Classe),
    Teacher(User),
    Student(User),
    User(User),
    Quiz(Quiz),
}

impl Resolved {
    pub fn key(&self) -> ContextKey {
        match self {
            Resolved::Classe(_) => ContextKey::Classe,
            Resolved::Teacher(_) => ContextKey::ParamTeacher,
            Resolved::Student(_) => ContextKey::ParamStudent,
            Resolved::User(_) => ContextKey::ParamUser,
            Resolved::Quiz(_) => ContextKey::Quiz,
        }
    }
}

/// Per-request state handed from guard to guard and finally to the handler.
///
/// The context is a value: attaching an entity consumes it and returns a new
/// one, so a guard can never observe a half-updated context.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    user: Option<Identity>,
    classe: Option<Classe>,
    param_teacher: Option<User>,
    param_student: Option<User>,
    param_user: Option<User>,
    quiz: Option<Quiz>,
    translator: Translator,
}

impl RequestContext {
    pub fn new(user: Option<Identity>, translator: Translator) -> Self {
        Self {
            user,
            translator,
            ..Default::default()
        }
    }

    pub fn anonymous(translator: Translator) -> Self {
        Self::new(None, translator)
    }

    pub fn authenticated(user: Identity, translator: Translator) -> Self {
        Self::new(Some(user), translator)
    }

    #[must_use]
    pub fn with_resolved(self, resolved: Resolved) -> Self {
        match resolved {
            Resolved::Classe(classe) => Self {
                classe: Some(classe),
                ..self
            },
            Resolved::Teacher(user) => Self {
                param_teacher: Some(user),
                ..self
            },
            Resolved::Student(user) => Self {
                param_student: Some(user),
                ..self
            },
            Resolved::User(user) => Self {
                param_user: Some(user),
                ..self
            },
            Resolved::Quiz(quiz) => Self {
                quiz: Some(quiz),
                ..self
            },
        }
    }

    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    pub fn classe(&self) -> Option<&Classe> {
        self.classe.as_ref()
    }

    pub fn param_teacher(&self) -> Option<&User> {
        self.param_teacher.as_ref()
    }

    pub fn param_student(&self) -> Option<&User> {
        self.param_student.as_ref()
    }

    pub fn param_user(&self) -> Option<&User> {
        self.param_user.as_ref()
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn translator(&self) -> Translator {
        self.translator
    }

    pub fn has(&self, key: ContextKey) -> bool {
        match key {
            ContextKey::User => self.user.is_some(),
            ContextKey::Classe => self.classe.is_some(),
            ContextKey::ParamTeacher => self.param_teacher.is_some(),
            ContextKey::ParamStudent => self.param_student.is_some(),
            ContextKey::ParamUser => self.param_user.is_some(),
            ContextKey::Quiz => self.quiz.is_some(),
        }
    }

    pub fn require_user(&self) -> AppResult<&Identity> {
        self.user.as_ref().ok_or_else(|| {
            AppError::Unauthorized(self.translator.translate(MessageKey::AuthenticationRequired))
        })
    }

    pub fn resolved_classe(&self) -> AppResult<&Classe> {
        self.classe().ok_or_else(|| unresolved(ContextKey::Classe))
    }

    pub fn resolved_teacher(&self) -> AppResult<&User> {
        self.param_teacher()
            .ok_or_else(|| unresolved(ContextKey::ParamTeacher))
    }

    pub fn resolved_student(&self) -> AppResult<&User> {
        self.param_student()
            .ok_or_else(|| unresolved(ContextKey::ParamStudent))
    }

    pub fn resolved_user(&self) -> AppResult<&User> {
        self.param_user().ok_or_else(|| unresolved(ContextKey::ParamUser))
    }

    pub fn resolved_quiz(&self) -> AppResult<&Quiz> {
        self.quiz().ok_or_else(|| unresolved(ContextKey::Quiz))
    }
}

// A handler asked for an entity its guard chain never resolved.
fn unresolved(key: ContextKey) -> AppError {
    AppError::InternalError(format!("'{}' was not resolved for this route", key.as_str()))
}

/// Translator for the request's `Accept-Language`, falling back to the
/// configured default locale.
pub fn request_translator(req: &HttpRequest) -> Translator {
    let fallback = req
        .app_data::<web::Data<AppState>>()
        .map(|state| state.config.default_locale)
        .unwrap_or_default();

    let header = req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    Translator::new(Locale::from_accept_language(header, fallback))
}

impl FromRequest for RequestContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<Identity>().cloned();
        ready(Ok(RequestContext::new(user, request_translator(req))))
    }
}
