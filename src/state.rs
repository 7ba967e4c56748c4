use std::sync::Arc;

use crate::db::MoodStore;
use crate::identity::OwnerResolver;

/// Shared handles passed to every handler through router state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MoodStore>,
    pub owners: Arc<dyn OwnerResolver>,
}

impl AppState {
    pub fn new(store: Arc<dyn MoodStore>, owners: Arc<dyn OwnerResolver>) -> Self {
        Self { store, owners }
    }
}
