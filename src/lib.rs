pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod import;
pub mod infrastructure;
pub mod models;
pub mod services;

pub use infrastructure::server;
