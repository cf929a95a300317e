//! Task entity definitions.
//!
//! A task is a time slot attached to an [`Event`](crate::Event). Stored
//! times are always UTC instants; the request types carry the client's raw
//! time strings, which the server normalizes before anything is written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: i64,
    /// Start of the slot (UTC).
    pub start_time: DateTime<Utc>,
    /// End of the slot (UTC).
    pub end_time: DateTime<Utc>,
    /// Identifier of the owning event.
    pub event_id: i64,
}

impl Task {
    /// Applies a normalized patch in place, leaving omitted fields untouched.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = end_time;
        }
        if let Some(event_id) = patch.event_id {
            self.event_id = event_id;
        }
    }
}

/// A normalized task ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_id: i64,
}

impl NewTask {
    /// Builds the stored entity once an id has been assigned.
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            start_time: self.start_time,
            end_time: self.end_time,
            event_id: self.event_id,
        }
    }
}

/// A normalized partial update for a [`Task`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Re-points the task at another event.
    pub event_id: Option<i64>,
}

/// Request body for creating a task.
///
/// Times are wall-clock strings in the server's configured zone, e.g.
/// `"09:00:00"` or `"2024-05-01T09:00:00"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub start_time: String,
    pub end_time: String,
    pub event_id: i64,
}

/// Request body for updating a task. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatchRequest {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub event_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_task_serializes_utc_instants() {
        let task = NewTask {
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 5, 1, 13, 15, 0).unwrap(),
            event_id: 1,
        }
        .into_task(3);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["start_time"], "2024-05-01T13:00:00Z");
        assert_eq!(json["event_id"], 1);
    }

    #[test]
    fn test_patch_request_omitted_fields() {
        let patch: TaskPatchRequest = serde_json::from_str(r#"{"end_time":"10:00"}"#).unwrap();

        assert_eq!(patch.start_time, None);
        assert_eq!(patch.end_time.as_deref(), Some("10:00"));
        assert_eq!(patch.event_id, None);
    }

    #[test]
    fn test_apply_patch() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        let mut task = NewTask {
            start_time: start,
            end_time: start,
            event_id: 1,
        }
        .into_task(1);

        task.apply(&TaskPatch {
            event_id: Some(2),
            ..Default::default()
        });

        assert_eq!(task.event_id, 2);
        assert_eq!(task.start_time, start);
    }
}
