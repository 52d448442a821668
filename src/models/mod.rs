pub mod author;
pub mod book;
pub mod borrow_record;
pub mod category;

