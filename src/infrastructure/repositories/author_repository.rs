//! SeaORM implementation of AuthorRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{Author, AuthorDefaults, AuthorRepository, DomainError};
use crate::models::author::{ActiveModel, Column, Entity as AuthorEntity};

/// SeaORM-based implementation of AuthorRepository
pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(Author::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Author>, DomainError> {
        // Names are not unique in the table; the oldest row is the canonical one
        let author = AuthorEntity::find()
            .filter(Column::Name.eq(name))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await?;

        Ok(author.map(Author::from))
    }

    async fn find_or_create(
        &self,
        name: &str,
        defaults: AuthorDefaults,
    ) -> Result<Author, DomainError> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let now = chrono::Utc::now().to_rfc3339();

        let author = ActiveModel {
            name: Set(name.to_string()),
            biography: Set(defaults.biography),
            birth_date: Set(defaults.birth_date),
            nationality: Set(defaults.nationality),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = author.insert(&self.db).await?;
        tracing::debug!(id = result.id, name = %result.name, "Created author");

        Ok(result.into())
    }
}
