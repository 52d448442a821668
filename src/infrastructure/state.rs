//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AuthorRepository, BookRepository, CategoryRepository};
use crate::import::{ImportSettings, RowImporter};
use crate::infrastructure::{
    SeaOrmAuthorRepository, SeaOrmBookRepository, SeaOrmCategoryRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub book_repo: Arc<dyn BookRepository>,
    pub author_repo: Arc<dyn AuthorRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub import_settings: ImportSettings,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_import_settings(db, ImportSettings::default())
    }

    pub fn with_import_settings(db: DatabaseConnection, import_settings: ImportSettings) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let author_repo = Arc::new(SeaOrmAuthorRepository::new(db.clone()));
        let category_repo = Arc::new(SeaOrmCategoryRepository::new(db.clone()));

        Self {
            db,
            book_repo,
            author_repo,
            category_repo,
            import_settings,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Row importer bound to this state's stores
    pub fn row_importer(&self) -> RowImporter<'_> {
        RowImporter::new(
            self.author_repo.as_ref(),
            self.category_repo.as_ref(),
            &self.import_settings,
        )
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
