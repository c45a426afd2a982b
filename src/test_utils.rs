use crate::{
    auth::Identity,
    models::domain::{Classe, Membership, UserRole},
};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use std::sync::Arc;

    use crate::repositories::{
        classe_repository::MockClasseRepository, quiz_repository::MockQuizRepository,
        user_repository::MockUserRepository, Repositories,
    };

    /// Identity of a caller whose username and email derive from `id`.
    pub fn identity(id: &str, role: UserRole) -> Identity {
        Identity {
            id: id.to_string(),
            username: id.to_string(),
            email: format!("{}@example.com", id),
            role,
        }
    }

    /// A class with the given teacher and student ids.
    pub fn classe_with(teachers: &[&str], students: &[&str]) -> Classe {
        let mut classe = Classe::new("History", "HIS001");
        for id in teachers {
            classe.insert_member(Membership::Teacher, id);
        }
        for id in students {
            classe.insert_member(Membership::Student, id);
        }
        classe
    }

    /// Mocks with no expectations: any store call fails the test.
    pub fn untouched_repositories() -> Repositories {
        Repositories::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockClasseRepository::new()),
            Arc::new(MockQuizRepository::new()),
        )
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_fixtures_identity() {
        let caller = identity("alice", UserRole::Teacher);
        assert_eq!(caller.email, "alice@example.com");
        assert!(!caller.is_admin());
    }

    #[test]
    fn test_fixtures_classe_with() {
        let classe = classe_with(&["t1"], &["s1", "s2"]);
        assert!(classe.has_teacher("t1"));
        assert_eq!(classe.student_ids.len(), 2);
        assert!(!classe.has_member("t2"));
    }
}
