// Models module

pub mod mood;

// Re-export commonly used types
pub use mood::{CreateMoodRequest, MoodEntry, UpdateMoodRequest};
