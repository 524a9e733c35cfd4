//! Entry repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::entries;

/// Entry repository for document reads and writes keyed by `unique_id`.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an entry by its exact key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_unique_id(
        &self,
        unique_id: &str,
    ) -> Result<Option<entries::Model>, DbErr> {
        entries::Entity::find()
            .filter(entries::Column::UniqueId.eq(unique_id))
            .one(&self.db)
            .await
    }

    /// Lists all entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_newest_first(&self) -> Result<Vec<entries::Model>, DbErr> {
        entries::Entity::find()
            .order_by_desc(entries::Column::CreatedAt)
            .order_by_desc(entries::Column::Id)
            .all(&self.db)
            .await
    }

    /// Inserts a document under `unique_id`, or overwrites the stored one.
    ///
    /// An overwrite keeps the original `created_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails, including a unique
    /// violation when a concurrent insert claimed the key first.
    pub async fn upsert(&self, unique_id: &str, document: String) -> Result<entries::Model, DbErr> {
        let now = chrono::Utc::now().into();

        match self.find_by_unique_id(unique_id).await? {
            Some(existing) => {
                let mut entry = existing.into_active_model();
                entry.document = Set(document);
                entry.updated_at = Set(now);
                entry.update(&self.db).await
            }
            None => {
                entries::ActiveModel {
                    unique_id: Set(unique_id.to_string()),
                    document: Set(document),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
    }

    /// Deletes an entry by key. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_by_unique_id(&self, unique_id: &str) -> Result<bool, DbErr> {
        let result = entries::Entity::delete_many()
            .filter(entries::Column::UniqueId.eq(unique_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
