pub mod classe;
pub mod quiz;
pub mod user;

pub use classe::{Classe, Membership};
pub use quiz::{Answer, Question, Quiz, QuizType};
pub use user::{User, UserRole};
