use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Every client-facing failure message goes through one of these keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKey {
    InvalidIdentifier,
    ClasseNotFound,
    ClasseCodeNotFound,
    StudentNotFound,
    TeacherNotFound,
    UserNotFound,
    QuizNotFound,
    AuthenticationRequired,
    InvalidToken,
    InvalidCredentials,
    AdminOnly,
    OnlyStudentsCanJoin,
    TeacherOrAdminOnly,
    NotTeacherOfClass,
    NotMemberOfClass,
    NotAuthorOfQuiz,
    UsernameTaken,
    EmailTaken,
    AlreadyTeacherOfClass,
    AlreadyStudentOfClass,
    ValidationFailed,
    InternalError,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Picks the first supported language of an `Accept-Language` header.
    /// Quality weights are ignored, header order wins.
    pub fn from_accept_language(header: Option<&str>, fallback: Locale) -> Locale {
        header
            .into_iter()
            .flat_map(|value| value.split(','))
            .filter_map(|tag| tag.split(';').next())
            .filter_map(|tag| tag.trim().split('-').next())
            .find_map(|primary| primary.parse().ok())
            .unwrap_or(fallback)
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Fr => write!(f, "fr"),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Translate: Send + Sync {
    fn translate(&self, key: MessageKey) -> String;
}

/// Catalog-backed translator for a single locale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Translate for Translator {
    fn translate(&self, key: MessageKey) -> String {
        match self.locale {
            Locale::En => english(key),
            Locale::Fr => french(key),
        }
        .to_string()
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::InvalidIdentifier => "The identifier is not a valid UUID",
        MessageKey::ClasseNotFound => "Class not found",
        MessageKey::ClasseCodeNotFound => "No class matches this code",
        MessageKey::StudentNotFound => "Student not found",
        MessageKey::TeacherNotFound => "Teacher not found",
        MessageKey::UserNotFound => "User not found",
        MessageKey::QuizNotFound => "Quiz not found",
        MessageKey::AuthenticationRequired => "You must be logged in",
        MessageKey::InvalidToken => "Invalid or expired token",
        MessageKey::InvalidCredentials => "Invalid username or password",
        MessageKey::AdminOnly => "Only administrators can perform this action",
        MessageKey::OnlyStudentsCanJoin => "Only students may join classes",
        MessageKey::TeacherOrAdminOnly => "Only teachers and administrators can perform this action",
        MessageKey::NotTeacherOfClass => "You are not a teacher of this class",
        MessageKey::NotMemberOfClass => "You are not a member of this class",
        MessageKey::NotAuthorOfQuiz => "You are not the author of this quiz",
        MessageKey::UsernameTaken => "This username is already taken",
        MessageKey::EmailTaken => "This email is already in use",
        MessageKey::AlreadyTeacherOfClass => "This user is already a teacher of the class",
        MessageKey::AlreadyStudentOfClass => "This user is already a student of the class",
        MessageKey::ValidationFailed => "The request is invalid",
        MessageKey::InternalError => "An internal error occurred",
    }
}

fn french(key: MessageKey) -> &'static str {
    match key {
        MessageKey::InvalidIdentifier => "L'identifiant n'est pas un UUID valide",
        MessageKey::ClasseNotFound => "Classe introuvable",
        MessageKey::ClasseCodeNotFound => "Aucune classe ne correspond à ce code",
        MessageKey::StudentNotFound => "Élève introuvable",
        MessageKey::TeacherNotFound => "Professeur introuvable",
        MessageKey::UserNotFound => "Utilisateur introuvable",
        MessageKey::QuizNotFound => "Quiz introuvable",
        MessageKey::AuthenticationRequired => "Vous devez être connecté",
        MessageKey::InvalidToken => "Jeton invalide ou expiré",
        MessageKey::InvalidCredentials => "Nom d'utilisateur ou mot de passe incorrect",
        MessageKey::AdminOnly => "Seuls les administrateurs peuvent effectuer cette action",
        MessageKey::OnlyStudentsCanJoin => "Seuls les élèves peuvent rejoindre une classe",
        MessageKey::TeacherOrAdminOnly => {
            "Seuls les professeurs et les administrateurs peuvent effectuer cette action"
        }
        MessageKey::NotTeacherOfClass => "Vous n'êtes pas professeur de cette classe",
        MessageKey::NotMemberOfClass => "Vous n'êtes pas membre de cette classe",
        MessageKey::NotAuthorOfQuiz => "Vous n'êtes pas l'auteur de ce quiz",
        MessageKey::UsernameTaken => "Ce nom d'utilisateur est déjà pris",
        MessageKey::EmailTaken => "Cet email est déjà utilisé",
        MessageKey::AlreadyTeacherOfClass => "Cet utilisateur est déjà professeur de la classe",
        MessageKey::AlreadyStudentOfClass => "Cet utilisateur est déjà élève de la classe",
        MessageKey::ValidationFailed => "La requête est invalide",
        MessageKey::InternalError => "Une erreur interne est survenue",
    }
}
