//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::DomainError;

/// Longest title the `books.title` column accepts.
pub const MAX_TITLE_LEN: usize = 255;

/// Author data shared by the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<String>,
    pub nationality: Option<String>,
}

/// Values applied only when an author has to be created
#[derive(Debug, Clone, Default)]
pub struct AuthorDefaults {
    pub biography: Option<String>,
    pub birth_date: Option<String>,
    pub nationality: Option<String>,
}

/// Category data shared by the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

/// Values applied only when a category has to be created
#[derive(Debug, Clone)]
pub struct CategoryDefaults {
    pub description: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
    Maintenance,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Borrowed => "borrowed",
            BookStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(BookStatus::Available),
            "borrowed" => Some(BookStatus::Borrowed),
            "maintenance" => Some(BookStatus::Maintenance),
            _ => None,
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A book ready to be inserted; it has no id until persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBook {
    pub title: String,
    pub isbn: Option<String>,
    pub author_id: i32,
    pub category_id: i32,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub pages: Option<i32>,
    pub description: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub location: Option<String>,
    pub status: BookStatus,
}

impl NewBook {
    /// Check the column constraints of the `books` table.
    pub fn validate(&self, max_year: i32) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".to_string()));
        }
        let title_len = self.title.chars().count();
        if title_len > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "title is {} characters long, maximum is {}",
                title_len, MAX_TITLE_LEN
            )));
        }
        if let Some(pages) = self.pages
            && pages <= 0
        {
            return Err(DomainError::Validation(format!(
                "page count must be positive, got {}",
                pages
            )));
        }
        if let Some(year) = self.publication_year
            && !(1000..=max_year).contains(&year)
        {
            return Err(DomainError::Validation(format!(
                "publication year {} outside 1000..={}",
                year, max_year
            )));
        }
        if self.available_copies > self.total_copies {
            return Err(DomainError::Validation(
                "available copies exceed total copies".to_string(),
            ));
        }
        Ok(())
    }
}

/// Repository trait for Author entity
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Find all authors
    async fn find_all(&self) -> Result<Vec<Author>, DomainError>;

    /// Find the first author with exactly this name
    async fn find_by_name(&self, name: &str) -> Result<Option<Author>, DomainError>;

    /// Return the author with this name, creating it with `defaults` if absent
    async fn find_or_create(
        &self,
        name: &str,
        defaults: AuthorDefaults,
    ) -> Result<Author, DomainError>;
}

/// Repository trait for Category entity
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find all categories
    async fn find_all(&self) -> Result<Vec<Category>, DomainError>;

    /// Return the category with this name, creating it with `defaults` if absent.
    /// Defaults are never re-applied to an existing row.
    async fn find_or_create(
        &self,
        name: &str,
        defaults: CategoryDefaults,
    ) -> Result<Category, DomainError>;
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a group of books, returning how many rows were written
    async fn create_many(&self, books: Vec<NewBook>) -> Result<u64, DomainError>;

    /// Count all books
    async fn count(&self) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> NewBook {
        NewBook {
            title: "Intro to Computing".to_string(),
            isbn: None,
            author_id: 1,
            category_id: 1,
            publisher: None,
            publication_year: Some(2005),
            pages: Some(320),
            description: String::new(),
            total_copies: 1,
            available_copies: 1,
            location: None,
            status: BookStatus::Available,
        }
    }

    #[test]
    fn test_valid_book_passes() {
        assert!(sample_book().validate(2026).is_ok());
    }

    #[test]
    fn test_zero_pages_rejected() {
        let mut book = sample_book();
        book.pages = Some(0);
        assert!(matches!(
            book.validate(2026),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_overlong_title_rejected() {
        let mut book = sample_book();
        book.title = "x".repeat(MAX_TITLE_LEN + 1);
        let err = book.validate(2026).unwrap_err();
        assert!(err.to_string().contains("maximum is 255"));
    }

    #[test]
    fn test_year_out_of_range_rejected() {
        let mut book = sample_book();
        book.publication_year = Some(2030);
        assert!(book.validate(2027).is_err());
        book.publication_year = Some(2027);
        assert!(book.validate(2027).is_ok());
    }

    #[test]
    fn test_status_round_trip_names() {
        assert_eq!(BookStatus::parse("borrowed"), Some(BookStatus::Borrowed));
        assert_eq!(BookStatus::Maintenance.to_string(), "maintenance");
        assert_eq!(BookStatus::parse("lost"), None);
    }
}
