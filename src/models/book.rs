use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{BookStatus, NewBook};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub isbn: Option<String>,
    pub author_id: i32,
    pub category_id: i32,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub pages: Option<i32>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub location: Option<String>,
    #[sea_orm(default_value = "available")]
    pub status: String, // 'available', 'borrowed', 'maintenance'
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(has_many = "super::borrow_record::Entity")]
    BorrowRecords,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::borrow_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BorrowRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn book_status(&self) -> Option<BookStatus> {
        BookStatus::parse(&self.status)
    }

    /// A book can be lent when a copy is on the shelf and it is not withdrawn
    pub fn is_available(&self) -> bool {
        self.available_copies > 0 && self.book_status() == Some(BookStatus::Available)
    }
}

impl From<NewBook> for ActiveModel {
    fn from(book: NewBook) -> Self {
        let now = chrono::Utc::now().to_rfc3339();

        Self {
            id: NotSet,
            title: Set(book.title),
            isbn: Set(book.isbn),
            author_id: Set(book.author_id),
            category_id: Set(book.category_id),
            publisher: Set(book.publisher),
            publication_year: Set(book.publication_year),
            pages: Set(book.pages),
            description: Set(Some(book.description)),
            cover_image: Set(None),
            total_copies: Set(book.total_copies),
            available_copies: Set(book.available_copies),
            location: Set(book.location),
            status: Set(book.status.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
    }
}
