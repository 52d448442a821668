//! Borrow Service - copy-count bookkeeping for lending
//!
//! Only keeps `available_copies` and the book status in step with open
//! borrow records. Fines, renewals and reminders belong to the host app.

use chrono::{Local, NaiveDateTime};
use sea_orm::*;

use crate::domain::BookStatus;
use crate::models::book::{self, Entity as Book};
use crate::models::borrow_record::{self, DATETIME_FORMAT, Entity as BorrowRecord};

/// Error type for service operations
#[derive(Debug)]
pub enum ServiceError {
    Database(String),
    NotFound,
    InvalidState(String),
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Database(e.to_string())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Database(msg) => write!(f, "Database error: {}", msg),
            ServiceError::NotFound => write!(f, "Not found"),
            ServiceError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Lend one copy of a book
pub async fn borrow_book(
    db: &DatabaseConnection,
    book_id: i32,
    user_id: i32,
    due_date: NaiveDateTime,
    notes: Option<String>,
) -> Result<borrow_record::Model, ServiceError> {
    let now = Local::now().format(DATETIME_FORMAT).to_string();
    let txn = db.begin().await?;

    // 1. Check the book has a copy on the shelf
    let book = Book::find_by_id(book_id)
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if !book.is_available() {
        return Err(ServiceError::InvalidState(format!(
            "Book is {} with {} of {} copies available",
            book.status, book.available_copies, book.total_copies
        )));
    }

    // 2. Create the record
    let record = borrow_record::ActiveModel {
        book_id: Set(book_id),
        user_id: Set(user_id),
        borrowed_at: Set(now.clone()),
        due_date: Set(due_date.format(DATETIME_FORMAT).to_string()),
        returned_at: Set(None),
        status: Set("borrowed".to_owned()),
        fine_amount: Set(0.0),
        notes: Set(notes),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    };
    let saved = record.insert(&txn).await?;

    // 3. Take the copy off the shelf
    let remaining = book.available_copies - 1;
    let mut book_active: book::ActiveModel = book.into();
    book_active.available_copies = Set(remaining);
    if remaining == 0 {
        book_active.status = Set(BookStatus::Borrowed.as_str().to_owned());
    }
    book_active.updated_at = Set(now);
    book_active.update(&txn).await?;

    txn.commit().await?;
    Ok(saved)
}

/// Close a borrow record and put the copy back
pub async fn return_book(
    db: &DatabaseConnection,
    record_id: i32,
) -> Result<borrow_record::Model, ServiceError> {
    let now = Local::now().format(DATETIME_FORMAT).to_string();
    let txn = db.begin().await?;

    // 1. Find the record
    let record = BorrowRecord::find_by_id(record_id)
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if record.status != "borrowed" {
        return Err(ServiceError::InvalidState(format!(
            "Borrow record is already {}",
            record.status
        )));
    }

    // 2. Close it
    let book_id = record.book_id;
    let mut record_active: borrow_record::ActiveModel = record.into();
    record_active.returned_at = Set(Some(now.clone()));
    record_active.status = Set("returned".to_owned());
    record_active.updated_at = Set(now.clone());
    let updated = record_active.update(&txn).await?;

    // 3. Put the copy back, never above the total
    let book = Book::find_by_id(book_id)
        .one(&txn)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let available = (book.available_copies + 1).min(book.total_copies);
    let was_borrowed = book.book_status() == Some(BookStatus::Borrowed);
    let mut book_active: book::ActiveModel = book.into();
    book_active.available_copies = Set(available);
    if was_borrowed {
        book_active.status = Set(BookStatus::Available.as_str().to_owned());
    }
    book_active.updated_at = Set(now);
    book_active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Borrow records still out past their due date
pub async fn list_overdue(
    db: &DatabaseConnection,
) -> Result<Vec<borrow_record::Model>, ServiceError> {
    let now = Local::now().naive_local();
    let open = BorrowRecord::find()
        .filter(borrow_record::Column::Status.eq("borrowed"))
        .order_by_asc(borrow_record::Column::DueDate)
        .all(db)
        .await?;

    Ok(open.into_iter().filter(|r| r.is_overdue(now)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::{author, category};
    use chrono::Duration;

    async fn seed_book(db: &DatabaseConnection, total: i32) -> i32 {
        let now = chrono::Utc::now().to_rfc3339();
        let author = author::ActiveModel {
            name: Set("Ursula K. Le Guin".to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create author");
        let category = category::ActiveModel {
            name: Set("Literature".to_owned()),
            color: Set("#6366f1".to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create category");
        let book = book::ActiveModel {
            title: Set("The Dispossessed".to_owned()),
            author_id: Set(author.id),
            category_id: Set(category.id),
            total_copies: Set(total),
            available_copies: Set(total),
            status: Set("available".to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create book");
        book.id
    }

    fn in_days(days: i64) -> NaiveDateTime {
        Local::now().naive_local() + Duration::days(days)
    }

    #[tokio::test]
    async fn test_borrow_and_return_keep_counts() {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        let book_id = seed_book(&db, 1).await;

        let record = borrow_book(&db, book_id, 7, in_days(14), None)
            .await
            .expect("borrow");
        let book = Book::find_by_id(book_id).one(&db).await.unwrap().unwrap();
        assert_eq!(book.available_copies, 0);
        assert_eq!(book.status, "borrowed");
        assert!(!book.is_available());

        // no copy left
        let err = borrow_book(&db, book_id, 8, in_days(14), None).await;
        assert!(matches!(err, Err(ServiceError::InvalidState(_))));

        let returned = return_book(&db, record.id).await.expect("return");
        assert_eq!(returned.status, "returned");
        assert!(returned.returned_at.is_some());

        let book = Book::find_by_id(book_id).one(&db).await.unwrap().unwrap();
        assert_eq!(book.available_copies, 1);
        assert_eq!(book.status, "available");

        // second return is refused
        let err = return_book(&db, record.id).await;
        assert!(matches!(err, Err(ServiceError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_multiple_copies_stay_available() {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        let book_id = seed_book(&db, 2).await;

        borrow_book(&db, book_id, 7, in_days(14), Some("reading room".into()))
            .await
            .expect("borrow");
        let book = Book::find_by_id(book_id).one(&db).await.unwrap().unwrap();
        assert_eq!(book.available_copies, 1);
        assert_eq!(book.status, "available");
    }

    #[tokio::test]
    async fn test_missing_book_and_record() {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        assert!(matches!(
            borrow_book(&db, 999, 1, in_days(1), None).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            return_book(&db, 999).await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_overdue() {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        let book_id = seed_book(&db, 3).await;

        let late = borrow_book(&db, book_id, 1, in_days(-3), None).await.unwrap();
        borrow_book(&db, book_id, 2, in_days(10), None).await.unwrap();

        let overdue = list_overdue(&db).await.expect("list");
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, late.id);
        assert!(overdue[0].days_overdue(Local::now().naive_local()) >= 2);
    }
}
