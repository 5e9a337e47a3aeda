//! Critica Content Review Platform
//!
//! A REST JSON API for a content-review platform: users sign up with emailed
//! access codes, exchange them for bearer tokens, and create or browse
//! categorized titles with genres, scored reviews and threaded comments.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
