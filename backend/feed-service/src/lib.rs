/// Feed Service Library
///
/// The post feed engine for the Porch neighborhood platform: filtered and
/// paginated listings plus the reactions (likes, dislikes, bookmarks, replies)
/// that hang off each post.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route tree
/// - `models`: Row types, filter variants, and response shapes
/// - `services`: Feed query and reaction engines
/// - `db`: Database access layer and repositories
/// - `auth`: JWT verification
/// - `middleware`: Authentication and metrics middleware
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
/// - `validators`: Input validation helpers
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
