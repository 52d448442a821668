//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};

use crate::domain::{BookRepository, DomainError, NewBook};
use crate::models::book::{ActiveModel, Entity as BookEntity};

// SQLite caps bound parameters per statement; 50 rows x 16 columns stays under it
const INSERT_CHUNK: usize = 50;

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn create_many(&self, books: Vec<NewBook>) -> Result<u64, DomainError> {
        if books.is_empty() {
            return Ok(0);
        }

        let count = books.len() as u64;
        let mut models: Vec<ActiveModel> = books.into_iter().map(ActiveModel::from).collect();

        // One group lands entirely or not at all
        let txn = self.db.begin().await?;
        while !models.is_empty() {
            let rest = models.split_off(models.len().min(INSERT_CHUNK));
            let chunk = std::mem::replace(&mut models, rest);
            BookEntity::insert_many(chunk).exec(&txn).await?;
        }
        txn.commit().await?;

        Ok(count)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(BookEntity::find().count(&self.db).await?)
    }
}
