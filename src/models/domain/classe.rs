use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserRole;

/// Which membership set of a class an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    Student,
    Teacher,
}

impl Membership {
    /// Stored field holding this set.
    pub fn field(&self) -> &'static str {
        match self {
            Membership::Student => "student_ids",
            Membership::Teacher => "teacher_ids",
        }
    }

    pub fn other(&self) -> Membership {
        match self {
            Membership::Student => Membership::Teacher,
            Membership::Teacher => Membership::Student,
        }
    }

    /// Whether a user holding `role` may sit in this set.
    pub fn admits(&self, role: UserRole) -> bool {
        matches!(
            (self, role),
            (Membership::Student, UserRole::Student) | (Membership::Teacher, UserRole::Teacher)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Classe {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub student_ids: Vec<String>,
    #[serde(default)]
    pub teacher_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Classe {
    pub fn new(name: &str, code: &str) -> Self {
        Classe {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            code: code.to_string(),
            student_ids: Vec::new(),
            teacher_ids: Vec::new(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn members(&self, membership: Membership) -> &[String] {
        match membership {
            Membership::Student => &self.student_ids,
            Membership::Teacher => &self.teacher_ids,
        }
    }

    pub fn has_teacher(&self, user_id: &str) -> bool {
        self.teacher_ids.iter().any(|id| id == user_id)
    }

    pub fn has_student(&self, user_id: &str) -> bool {
        self.student_ids.iter().any(|id| id == user_id)
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.has_teacher(user_id) || self.has_student(user_id)
    }

    /// Set insertion. Returns false when the user was already in the set.
    pub fn insert_member(&mut self, membership: Membership, user_id: &str) -> bool {
        let set = self.members_mut(membership);
        if set.iter().any(|id| id == user_id) {
            return false;
        }
        set.push(user_id.to_string());
        true
    }

    /// Set removal. Returns false when the user was not in the set.
    pub fn remove_member(&mut self, membership: Membership, user_id: &str) -> bool {
        let set = self.members_mut(membership);
        let before = set.len();
        set.retain(|id| id != user_id);
        set.len() != before
    }

    fn members_mut(&mut self, membership: Membership) -> &mut Vec<String> {
        match membership {
            Membership::Student => &mut self.student_ids,
            Membership::Teacher => &mut self.teacher_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_classe_is_empty() {
        let classe = Classe::new("Maths 6B", "AB12CD");

        assert!(classe.student_ids.is_empty());
        assert!(classe.teacher_ids.is_empty());
        assert!(Uuid::parse_str(&classe.id).is_ok());
    }

    #[test]
    fn test_insert_member_is_idempotent() {
        let mut classe = Classe::new("Maths 6B", "AB12CD");

        assert!(classe.insert_member(Membership::Student, "u1"));
        assert!(!classe.insert_member(Membership::Student, "u1"));
        assert_eq!(classe.student_ids, vec!["u1".to_string()]);
        assert!(classe.has_student("u1"));
        assert!(!classe.has_teacher("u1"));
    }

    #[test]
    fn test_remove_missing_member_is_noop() {
        let mut classe = Classe::new("Maths 6B", "AB12CD");
        classe.insert_member(Membership::Teacher, "t1");

        assert!(!classe.remove_member(Membership::Teacher, "t2"));
        assert!(classe.remove_member(Membership::Teacher, "t1"));
        assert!(classe.teacher_ids.is_empty());
    }

    #[test]
    fn test_membership_fields() {
        assert_eq!(Membership::Student.field(), "student_ids");
        assert_eq!(Membership::Teacher.other(), Membership::Student);
    }

    #[test]
    fn test_membership_admits_matching_role_only() {
        assert!(Membership::Student.admits(UserRole::Student));
        assert!(Membership::Teacher.admits(UserRole::Teacher));
        assert!(!Membership::Student.admits(UserRole::Teacher));
        assert!(!Membership::Teacher.admits(UserRole::Student));
        assert!(!Membership::Teacher.admits(UserRole::Admin));
        assert!(!Membership::Student.admits(UserRole::Customer));
    }
}
