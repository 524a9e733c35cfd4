//! Expense repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::expenses;

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates the id for a new expense.
    #[must_use]
    pub fn next_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Inserts an expense document under `expense_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        expense_id: String,
        document: String,
    ) -> Result<expenses::Model, DbErr> {
        expenses::ActiveModel {
            id: NotSet,
            expense_id: Set(expense_id),
            document: Set(document),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }

    /// Lists all expenses, newest first.
    ///
    /// Expenses recorded within the same clock tick keep insertion order
    /// through the serial `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_newest_first(&self) -> Result<Vec<expenses::Model>, DbErr> {
        expenses::Entity::find()
            .order_by_desc(expenses::Column::CreatedAt)
            .order_by_desc(expenses::Column::Id)
            .all(&self.db)
            .await
    }

    /// Deletes an expense. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, expense_id: &str) -> Result<bool, DbErr> {
        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::ExpenseId.eq(expense_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
