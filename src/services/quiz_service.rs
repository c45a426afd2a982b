use std::sync::Arc;

use crate::{
    auth::Identity,
    errors::{AppError, AppResult},
    i18n::{MessageKey, Translate},
    models::{
        domain::{Answer, Classe, Question, Quiz},
        dto::request::{CreateQuestionRequest, CreateQuizRequest, DEFAULT_TIME_LIMIT_SECS},
    },
    repositories::QuizRepository,
    validation::validate_request,
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        request: CreateQuizRequest,
        author: &Identity,
        translator: &dyn Translate,
    ) -> AppResult<Quiz> {
        validate_request(&request, translator)?;

        let quiz = Quiz::new(
            request.title.trim(),
            request.quiz_type,
            request.image,
            &author.id,
        );
        let quiz = self.repository.create(quiz).await?;

        log::info!("Quiz {} '{}' created by {}", quiz.id, quiz.title, author.id);
        Ok(quiz)
    }

    pub async fn list_by_author(&self, author: &Identity) -> AppResult<Vec<Quiz>> {
        self.repository.find_by_author(&author.id).await
    }

    pub async fn list_for_classe(&self, classe: &Classe) -> AppResult<Vec<Quiz>> {
        self.repository.find_by_classe(&classe.id).await
    }

    /// Distributes the quiz to the class. Assigning twice is a no-op.
    pub async fn assign(
        &self,
        quiz: &Quiz,
        classe: &Classe,
        translator: &dyn Translate,
    ) -> AppResult<Quiz> {
        if quiz.is_assigned_to(&classe.id) {
            return Ok(quiz.clone());
        }

        let updated = self
            .repository
            .assign_classe(&quiz.id, &classe.id)
            .await?
            .ok_or_else(|| not_found(translator))?;

        log::info!("Quiz {} assigned to class {}", quiz.id, classe.id);
        Ok(updated)
    }

    pub async fn unassign(
        &self,
        quiz: &Quiz,
        classe: &Classe,
        translator: &dyn Translate,
    ) -> AppResult<Quiz> {
        let updated = self
            .repository
            .unassign_classe(&quiz.id, &classe.id)
            .await?
            .ok_or_else(|| not_found(translator))?;

        log::info!("Quiz {} withdrawn from class {}", quiz.id, classe.id);
        Ok(updated)
    }

    /// Appends a question after the current last one.
    pub async fn add_question(
        &self,
        quiz: &Quiz,
        request: CreateQuestionRequest,
        translator: &dyn Translate,
    ) -> AppResult<Quiz> {
        validate_request(&request, translator)?;

        let answers: Vec<Answer> = request.answers.into_iter().map(Answer::from).collect();
        let question = Question::new(
            request.prompt.trim(),
            answers,
            request.time_limit_secs.unwrap_or(DEFAULT_TIME_LIMIT_SECS),
            quiz.next_question_order(),
        );

        let updated = self
            .repository
            .push_question(&quiz.id, question)
            .await?
            .ok_or_else(|| not_found(translator))?;

        log::debug!(
            "Quiz {} now has {} questions",
            updated.id,
            updated.questions.len()
        );
        Ok(updated)
    }

    pub async fn delete(&self, quiz: &Quiz, translator: &dyn Translate) -> AppResult<()> {
        if !self.repository.delete(&quiz.id).await? {
            return Err(not_found(translator));
        }

        log::info!("Deleted quiz {}", quiz.id);
        Ok(())
    }
}

fn not_found(translator: &dyn Translate) -> AppError {
    AppError::NotFound(translator.translate(MessageKey::QuizNotFound))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        i18n::Translator,
        models::{
            domain::{QuizType, UserRole},
            dto::request::AnswerInput,
        },
        repositories::quiz_repository::MockQuizRepository,
    };
    use mockall::predicate::eq;

    fn author() -> Identity {
        Identity {
            id: "t1".to_string(),
            username: "t1".to_string(),
            email: "t1@example.com".to_string(),
            role: UserRole::Teacher,
        }
    }

    fn answer(text: &str, correct: bool) -> AnswerInput {
        AnswerInput {
            text: text.to_string(),
            correct,
        }
    }

    #[tokio::test]
    async fn test_create_sets_author() {
        let mut repository = MockQuizRepository::new();
        repository.expect_create().times(1).returning(Ok);

        let request = CreateQuizRequest {
            title: "  Capitals ".to_string(),
            quiz_type: QuizType::Survey,
            image: Some("quizzes/capitals.png".to_string()),
        };
        let quiz = QuizService::new(Arc::new(repository))
            .create(request, &author(), &Translator::default())
            .await
            .unwrap();

        assert_eq!(quiz.title, "Capitals");
        assert!(quiz.is_authored_by("t1"));
        assert_eq!(quiz.quiz_type, QuizType::Survey);
    }

    #[tokio::test]
    async fn test_invalid_quiz_is_not_stored() {
        let mut repository = MockQuizRepository::new();
        repository.expect_create().never();

        let request = CreateQuizRequest {
            title: String::new(),
            quiz_type: QuizType::Classic,
            image: None,
        };
        let result = QuizService::new(Arc::new(repository))
            .create(request, &author(), &Translator::default())
            .await;

        match result {
            Err(AppError::ValidationError(_, fields)) => assert_eq!(fields[0].field, "title"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_assign_twice_skips_the_store() {
        let mut repository = MockQuizRepository::new();
        repository.expect_assign_classe().never();

        let classe = Classe::new("Geography", "GEO001");
        let mut quiz = Quiz::new("Capitals", QuizType::Classic, None, "t1");
        quiz.class_ids.push(classe.id.clone());

        let result = QuizService::new(Arc::new(repository))
            .assign(&quiz, &classe, &Translator::default())
            .await
            .unwrap();

        assert_eq!(result.class_ids, vec![classe.id]);
    }

    #[tokio::test]
    async fn test_question_gets_next_order_and_default_time_limit() {
        let quiz = Quiz::new("Capitals", QuizType::Classic, None, "t1");
        let quiz_id = quiz.id.clone();
        let stored = quiz.clone();

        let mut repository = MockQuizRepository::new();
        repository
            .expect_push_question()
            .withf(move |id, question| {
                id == quiz_id && question.order == 1 && question.time_limit_secs == 20
            })
            .times(1)
            .returning(move |_, question| {
                let mut quiz = stored.clone();
                quiz.questions.push(question);
                Ok(Some(quiz))
            });

        let request = CreateQuestionRequest {
            prompt: "Capital of France?".to_string(),
            answers: vec![answer("Paris", true), answer("Lyon", false)],
            time_limit_secs: None,
        };
        let updated = QuizService::new(Arc::new(repository))
            .add_question(&quiz, request, &Translator::default())
            .await
            .unwrap();

        assert_eq!(updated.questions.len(), 1);
        assert!(updated.questions[0].answers[0].correct);
    }

    #[tokio::test]
    async fn test_delete_missing_quiz() {
        let quiz = Quiz::new("Capitals", QuizType::Classic, None, "t1");

        let mut repository = MockQuizRepository::new();
        repository
            .expect_delete()
            .with(eq(quiz.id.clone()))
            .times(1)
            .returning(|_| Ok(false));

        let result = QuizService::new(Arc::new(repository))
            .delete(&quiz, &Translator::default())
            .await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Quiz not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}
