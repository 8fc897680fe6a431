pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod interviews;
pub mod journal;
pub mod listing;
pub mod state;
pub mod todos;
