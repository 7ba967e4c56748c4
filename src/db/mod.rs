// Storage layer
// The store handle is created once in main and shared with handlers through router state.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::MoodEntry;

pub use memory::InMemoryMoodStore;
pub use postgres::Database;

/// Document-store operations needed by the mood handlers.
/// Every method maps to exactly one round trip against the backing store.
#[async_trait]
pub trait MoodStore: Send + Sync {
    /// All entries owned by `owner_id`, newest `date` first
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<MoodEntry>, ApiError>;

    async fn insert(&self, entry: MoodEntry) -> Result<MoodEntry, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MoodEntry>, ApiError>;

    /// Persist `score`, `note` and `tags` of an existing entry
    async fn update(&self, entry: &MoodEntry) -> Result<MoodEntry, ApiError>;

    /// Returns false when no entry with `id` existed
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    async fn health_check(&self) -> Result<(), ApiError>;

    /// Release backend resources. Called once after the server has shut down.
    async fn close(&self);
}
