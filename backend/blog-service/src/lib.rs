/// Blog Service Library
///
/// A community blog: authors publish posts (optionally in a group), readers
/// comment on them and follow authors to get a personal feed.
///
/// # Modules
///
/// - `handlers`: HTTP handlers returning JSON page contexts
/// - `models`: Stored rows, read views, forms and page contexts
/// - `services`: Feed builder, post, comment and follow logic
/// - `db`: Content store traits with PostgreSQL and in-memory backends
/// - `cache`: Rendered index page cache (Redis or in-process)
/// - `middleware`: Identity resolution, authorization gate, request timing
/// - `pagination`: Fixed-size page windows shared by every feed
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use handlers::AppState;
