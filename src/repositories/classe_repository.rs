use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::{Database, CLASSES_COLLECTION},
    errors::AppResult,
    models::domain::{Classe, Membership},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClasseRepository: Send + Sync {
    async fn create(&self, classe: Classe) -> AppResult<Classe>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Classe>>;
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Classe>>;
    async fn find_all(&self) -> AppResult<Vec<Classe>>;
    /// Classes where the user is a teacher or a student.
    async fn find_for_member(&self, user_id: &str) -> AppResult<Vec<Classe>>;
    /// Atomic set insertion. Returns `None` when the class does not exist or
    /// the user already sits in the other membership set.
    async fn add_member(
        &self,
        classe_id: &str,
        membership: Membership,
        user_id: &str,
    ) -> AppResult<Option<Classe>>;
    /// Atomic set removal. Returns `None` when the class does not exist.
    async fn remove_member(
        &self,
        classe_id: &str,
        membership: Membership,
        user_id: &str,
    ) -> AppResult<Option<Classe>>;
    /// Pulls the user out of every class. Returns the number of classes touched.
    async fn remove_user_everywhere(&self, user_id: &str) -> AppResult<u64>;
    /// Pulls the user out of one membership set in every class.
    async fn remove_membership_everywhere(
        &self,
        membership: Membership,
        user_id: &str,
    ) -> AppResult<u64>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoClasseRepository {
    collection: Collection<Classe>,
}

impl MongoClasseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(CLASSES_COLLECTION);
        Self { collection }
    }
}

#[async_trait]
impl ClasseRepository for MongoClasseRepository {
    async fn create(&self, classe: Classe) -> AppResult<Classe> {
        self.collection.insert_one(&classe).await?;
        Ok(classe)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Classe>> {
        let classe = self.collection.find_one(doc! { "id": id }).await?;
        Ok(classe)
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Classe>> {
        let classe = self.collection.find_one(doc! { "code": code }).await?;
        Ok(classe)
    }

    async fn find_all(&self) -> AppResult<Vec<Classe>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let classes: Vec<Classe> = cursor.try_collect().await?;
        Ok(classes)
    }

    async fn find_for_member(&self, user_id: &str) -> AppResult<Vec<Classe>> {
        let filter = doc! {
            "$or": [{ "student_ids": user_id }, { "teacher_ids": user_id }]
        };
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        let classes: Vec<Classe> = cursor.try_collect().await?;
        Ok(classes)
    }

    async fn add_member(
        &self,
        classe_id: &str,
        membership: Membership,
        user_id: &str,
    ) -> AppResult<Option<Classe>> {
        let mut filter = doc! { "id": classe_id };
        filter.insert(membership.other().field(), doc! { "$ne": user_id });

        let mut set = Document::new();
        set.insert(membership.field(), user_id);

        let classe = self
            .collection
            .find_one_and_update(filter, doc! { "$addToSet": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(classe)
    }

    async fn remove_member(
        &self,
        classe_id: &str,
        membership: Membership,
        user_id: &str,
    ) -> AppResult<Option<Classe>> {
        let mut pull = Document::new();
        pull.insert(membership.field(), user_id);

        let classe = self
            .collection
            .find_one_and_update(doc! { "id": classe_id }, doc! { "$pull": pull })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(classe)
    }

    async fn remove_user_everywhere(&self, user_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .update_many(
                doc! { "$or": [{ "student_ids": user_id }, { "teacher_ids": user_id }] },
                doc! { "$pull": { "student_ids": user_id, "teacher_ids": user_id } },
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn remove_membership_everywhere(
        &self,
        membership: Membership,
        user_id: &str,
    ) -> AppResult<u64> {
        let mut filter = Document::new();
        filter.insert(membership.field(), user_id);

        let mut pull = Document::new();
        pull.insert(membership.field(), user_id);

        let result = self
            .collection
            .update_many(filter, doc! { "$pull": pull })
            .await?;
        Ok(result.modified_count)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for classes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let code_index = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("code_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_indexes([id_index, code_index]).await?;

        Ok(())
    }
}
