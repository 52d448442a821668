//! SeaORM implementation of CategoryRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{Category, CategoryDefaults, CategoryRepository, DomainError};
use crate::models::category::{ActiveModel, Column, Entity as CategoryEntity};

/// SeaORM-based implementation of CategoryRepository
pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        let category = CategoryEntity::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?;

        Ok(category.map(Category::from))
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let categories = CategoryEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn find_or_create(
        &self,
        name: &str,
        defaults: CategoryDefaults,
    ) -> Result<Category, DomainError> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let now = chrono::Utc::now().to_rfc3339();

        let category = ActiveModel {
            name: Set(name.to_string()),
            description: Set(defaults.description),
            color: Set(defaults.color),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = category.insert(&self.db).await?;
        tracing::info!(id = result.id, name = %result.name, "Created category");

        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    fn defaults(color: &str) -> CategoryDefaults {
        CategoryDefaults {
            description: Some("Auto-generated".to_string()),
            color: color.to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_or_create_reuses_existing_row() {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        let repo = SeaOrmCategoryRepository::new(db);

        let first = repo
            .find_or_create("Religion", defaults("#f59e0b"))
            .await
            .expect("create");
        let second = repo
            .find_or_create("Religion", defaults("#000000"))
            .await
            .expect("reuse");

        assert_eq!(first.id, second.id);
        // defaults are not re-applied to an existing row
        assert_eq!(second.color, "#f59e0b");
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}
