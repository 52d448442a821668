//! Services Layer
//!
//! Business logic that sits beside the import pipeline and is called
//! directly or through HTTP handlers.

pub mod borrow_service;

pub use borrow_service::{ServiceError, borrow_book, list_overdue, return_book};
