use chrono::{NaiveDateTime, ParseResult};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Format of every datetime column in this table
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "borrow_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub borrowed_at: String,
    pub due_date: String,
    pub returned_at: Option<String>,
    pub status: String, // 'borrowed', 'returned', 'lost'
    pub fine_amount: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn due(&self) -> ParseResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.due_date, DATETIME_FORMAT)
    }

    /// Still out and past its due date. An unparseable due date never counts as overdue.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.status == "borrowed" && self.due().map(|due| due < now).unwrap_or(false)
    }

    /// Whole days past the due date, 0 when not overdue
    pub fn days_overdue(&self, now: NaiveDateTime) -> i64 {
        if !self.is_overdue(now) {
            return 0;
        }
        self.due().map(|due| (now - due).num_days()).unwrap_or(0)
    }
}
