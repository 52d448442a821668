//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Repository implementations (repositories)
//! - HTTP server setup (server)
//! - Application state (state)

pub mod repositories;
pub mod server;
pub mod state;

pub use repositories::*;
pub use state::AppState;
