//! Event entity definitions.

use serde::{Deserialize, Serialize};

/// An event that tasks can be attached to.
///
/// Events are always addressed by their store-assigned `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned identifier.
    pub id: i64,
    /// Event title.
    pub title: String,
    /// Image reference or URL.
    pub image: String,
}

/// Payload for creating an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Image reference or URL.
    #[serde(default)]
    pub image: String,
}

impl NewEvent {
    /// Creates a new event payload.
    pub fn new(title: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: image.into(),
        }
    }

    /// Builds the stored entity once an id has been assigned.
    pub fn into_event(self, id: i64) -> Event {
        Event {
            id,
            title: self.title,
            image: self.image,
        }
    }
}

/// Partial update for an [`Event`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New image reference.
    #[serde(default)]
    pub image: Option<String>,
}

impl Event {
    /// Applies a patch in place, leaving omitted fields untouched.
    pub fn apply(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
    }
}
