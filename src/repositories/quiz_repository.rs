use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{FindOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::{Database, QUIZZES_COLLECTION},
    errors::AppResult,
    models::domain::{Question, Quiz},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_by_author(&self, author_id: &str) -> AppResult<Vec<Quiz>>;
    async fn find_by_classe(&self, classe_id: &str) -> AppResult<Vec<Quiz>>;
    async fn assign_classe(&self, quiz_id: &str, classe_id: &str) -> AppResult<Option<Quiz>>;
    async fn unassign_classe(&self, quiz_id: &str, classe_id: &str) -> AppResult<Option<Quiz>>;
    /// Drops a deleted class from every quiz. Returns the number of quizzes touched.
    async fn detach_classe_everywhere(&self, classe_id: &str) -> AppResult<u64>;
    async fn push_question(&self, quiz_id: &str, question: Question) -> AppResult<Option<Quiz>>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(QUIZZES_COLLECTION);
        Self { collection }
    }

    async fn find_sorted(&self, filter: mongodb::bson::Document) -> AppResult<Vec<Quiz>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        let quizzes: Vec<Quiz> = cursor.try_collect().await?;
        Ok(quizzes)
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn find_by_author(&self, author_id: &str) -> AppResult<Vec<Quiz>> {
        self.find_sorted(doc! { "author_id": author_id }).await
    }

    async fn find_by_classe(&self, classe_id: &str) -> AppResult<Vec<Quiz>> {
        self.find_sorted(doc! { "class_ids": classe_id }).await
    }

    async fn assign_classe(&self, quiz_id: &str, classe_id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one_and_update(
                doc! { "id": quiz_id },
                doc! { "$addToSet": { "class_ids": classe_id } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(quiz)
    }

    async fn unassign_classe(&self, quiz_id: &str, classe_id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one_and_update(
                doc! { "id": quiz_id },
                doc! { "$pull": { "class_ids": classe_id } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(quiz)
    }

    async fn detach_classe_everywhere(&self, classe_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .update_many(
                doc! { "class_ids": classe_id },
                doc! { "$pull": { "class_ids": classe_id } },
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn push_question(&self, quiz_id: &str, question: Question) -> AppResult<Option<Quiz>> {
        let question = to_bson(&question)?;
        let quiz = self
            .collection
            .find_one_and_update(
                doc! { "id": quiz_id },
                doc! { "$push": { "questions": question } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let author_index = IndexModel::builder()
            .keys(doc! { "author_id": 1 })
            .build();

        self.collection
            .create_indexes([id_index, author_index])
            .await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}
