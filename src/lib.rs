// Library root for the mood tracker API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use db::{Database, InMemoryMoodStore, MoodStore};
pub use config::HttpConfig;
pub use error::{ApiError, ApiResult};
pub use identity::{OwnerResolver, PlaceholderOwnerResolver};
pub use models::{CreateMoodRequest, MoodEntry, UpdateMoodRequest};
pub use routes::create_router;
pub use state::AppState;
