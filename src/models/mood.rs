use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::identity::first_claimed;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

/// A single mood report owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: Uuid,
    pub score: i32,
    pub note: Option<String>,
    pub tags: Vec<String>,
    pub date: DateTime<Utc>,
    pub owner_id: String,
}

/// Request structure for creating a new mood entry.
/// `score` stays optional here so that a missing score is reported as a validation error
/// rather than a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMoodRequest {
    pub score: Option<i32>,
    pub note: Option<String>,
    pub tags: Option<Vec<String>>,
    pub date: Option<DateTime<Utc>>,
    pub owner_id: Option<String>,
    /// Older clients send `userId`; `ownerId` wins when both are present
    pub user_id: Option<String>,
}

/// Request structure for a partial update.
/// `note` distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMoodRequest {
    pub score: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub note: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub owner_id: Option<String>,
    /// Older clients send `userId`; `ownerId` wins when both are present
    pub user_id: Option<String>,
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl MoodEntry {
    /// Create a new entry with a generated id; `date` falls back to now
    pub fn new(
        owner_id: String,
        score: i32,
        note: Option<String>,
        tags: Vec<String>,
        date: Option<DateTime<Utc>>,
    ) -> Self {
        MoodEntry {
            id: Uuid::new_v4(),
            score,
            note,
            tags,
            date: date.unwrap_or_else(Utc::now),
            owner_id,
        }
    }

    /// Check the persisted invariants of an entry
    pub fn validate(&self) -> Result<(), String> {
        validate_score(self.score)?;

        if self.owner_id.trim().is_empty() {
            return Err("Owner ID cannot be empty".to_string());
        }

        Ok(())
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    /// Overwrite only the supplied fields. `id`, `date` and `owner_id` never change.
    pub fn apply_update(&mut self, request: UpdateMoodRequest) {
        if let Some(score) = request.score {
            self.score = score;
        }

        if let Some(note) = request.note {
            self.note = note;
        }

        if let Some(tags) = request.tags {
            self.tags = tags;
        }
    }
}

impl CreateMoodRequest {
    pub fn claimed_owner(&self) -> Option<&str> {
        first_claimed([self.owner_id.as_deref(), self.user_id.as_deref()])
    }

    /// Validate the fields supplied by the caller
    pub fn validate(&self) -> Result<(), String> {
        match self.score {
            Some(score) => validate_score(score),
            None => Err("Score is required".to_string()),
        }
    }

    /// Convert to a MoodEntry for the resolved owner
    pub fn into_entry(self, owner_id: String) -> Result<MoodEntry, String> {
        self.validate()?;
        let score = self.score.unwrap_or_default();

        let entry = MoodEntry::new(
            owner_id,
            score,
            self.note,
            self.tags.unwrap_or_default(),
            self.date,
        );
        entry.validate()?;

        Ok(entry)
    }
}

impl UpdateMoodRequest {
    pub fn claimed_owner(&self) -> Option<&str> {
        first_claimed([self.owner_id.as_deref(), self.user_id.as_deref()])
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(score) = self.score {
            validate_score(score)?;
        }

        Ok(())
    }
}

fn validate_score(score: i32) -> Result<(), String> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(format!(
            "Score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_entry() -> MoodEntry {
        MoodEntry {
            id: Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap(),
            score: 7,
            note: Some("Slept well".to_string()),
            tags: vec!["calm".to_string(), "rested".to_string()],
            date: Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
            owner_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_mood_entry_creation_defaults_date() {
        let before = Utc::now();
        let entry = MoodEntry::new("u1".to_string(), 5, None, Vec::new(), None);

        assert_eq!(entry.score, 5);
        assert_eq!(entry.owner_id, "u1");
        assert!(entry.note.is_none());
        assert!(entry.tags.is_empty());
        assert!(entry.date >= before);
    }

    #[test]
    fn test_mood_entry_creation_keeps_supplied_date() {
        let date = Utc.with_ymd_and_hms(2023, 12, 24, 20, 0, 0).unwrap();
        let entry = MoodEntry::new("u1".to_string(), 9, None, Vec::new(), Some(date));

        assert_eq!(entry.date, date);
    }

    #[test]
    fn test_every_score_in_range_is_accepted() {
        for score in MIN_SCORE..=MAX_SCORE {
            let request = CreateMoodRequest {
                score: Some(score),
                ..Default::default()
            };
            let entry = request.into_entry("u1".to_string()).unwrap();
            assert_eq!(entry.score, score);
        }
    }

    #[test]
    fn test_create_request_validation() {
        let missing = CreateMoodRequest::default();
        assert_eq!(missing.validate().unwrap_err(), "Score is required");

        for score in [0, 11, -3, 100] {
            let request = CreateMoodRequest {
                score: Some(score),
                ..Default::default()
            };
            assert!(request.validate().is_err(), "score {} should be rejected", score);
        }
    }

    #[test]
    fn test_into_entry_rejects_blank_owner() {
        let request = CreateMoodRequest {
            score: Some(4),
            ..Default::default()
        };

        assert!(request.into_entry("   ".to_string()).is_err());
    }

    #[test]
    fn test_apply_update_only_touches_supplied_fields() {
        let mut entry = sample_entry();
        let original = entry.clone();

        entry.apply_update(UpdateMoodRequest {
            note: Some(Some("Rough afternoon".to_string())),
            ..Default::default()
        });

        assert_eq!(entry.note.as_deref(), Some("Rough afternoon"));
        assert_eq!(entry.score, original.score);
        assert_eq!(entry.tags, original.tags);
        assert_eq!(entry.id, original.id);
        assert_eq!(entry.date, original.date);
        assert_eq!(entry.owner_id, original.owner_id);
    }

    #[test]
    fn test_apply_update_can_clear_note() {
        let mut entry = sample_entry();
        entry.apply_update(UpdateMoodRequest {
            note: Some(None),
            ..Default::default()
        });

        assert!(entry.note.is_none());
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent_note() {
        let absent: UpdateMoodRequest = serde_json::from_str(r#"{"score":3}"#).unwrap();
        assert_eq!(absent.score, Some(3));
        assert!(absent.note.is_none());

        let cleared: UpdateMoodRequest = serde_json::from_str(r#"{"note":null}"#).unwrap();
        assert_eq!(cleared.note, Some(None));

        let set: UpdateMoodRequest = serde_json::from_str(r#"{"note":"ok"}"#).unwrap();
        assert_eq!(set.note, Some(Some("ok".to_string())));
    }

    #[test]
    fn test_update_request_validation() {
        let out_of_range = UpdateMoodRequest {
            score: Some(11),
            ..Default::default()
        };
        assert!(out_of_range.validate().is_err());

        let note_only = UpdateMoodRequest {
            note: Some(Some("fine".to_string())),
            ..Default::default()
        };
        assert!(note_only.validate().is_ok());
    }

    #[test]
    fn test_mood_entry_serialization() {
        let json = serde_json::to_string(&sample_entry()).expect("Failed to serialize entry");
        let expected = r#"{"id":"123e4567-e89b-12d3-a456-426614174000","score":7,"note":"Slept well","tags":["calm","rested"],"date":"2024-03-01T08:30:00Z","ownerId":"u1"}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_create_request_accepts_legacy_user_id() {
        let request: CreateMoodRequest =
            serde_json::from_str(r#"{"score":6,"tags":["work"],"userId":"u2"}"#)
                .expect("Failed to deserialize CreateMoodRequest");

        assert_eq!(request.score, Some(6));
        assert_eq!(request.tags, Some(vec!["work".to_string()]));
        assert_eq!(request.claimed_owner(), Some("u2"));
        assert!(request.note.is_none());
    }

    #[test]
    fn test_owner_id_takes_priority_over_user_id() {
        let request: UpdateMoodRequest =
            serde_json::from_str(r#"{"userId":"legacy","ownerId":"u1"}"#).unwrap();
        assert_eq!(request.claimed_owner(), Some("u1"));

        let request: CreateMoodRequest =
            serde_json::from_str(r#"{"score":2,"ownerId":" ","userId":"legacy"}"#).unwrap();
        assert_eq!(request.claimed_owner(), Some("legacy"));
    }

    #[test]
    fn test_create_request_rejects_non_numeric_score() {
        let result = serde_json::from_str::<CreateMoodRequest>(r#"{"score":"seven"}"#);
        assert!(result.is_err());
    }
}
