//! Routine entity definitions.

use serde::{Deserialize, Serialize};

/// A reusable routine. Routines have no relation to events or tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    /// Store-assigned identifier.
    pub id: i64,
    /// Routine name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

/// Payload for creating a [`Routine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoutine {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewRoutine {
    /// Creates a new routine payload.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Builds the stored entity once an id has been assigned.
    pub fn into_routine(self, id: i64) -> Routine {
        Routine {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

/// Partial update for a [`Routine`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutinePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Routine {
    /// Applies a patch in place, leaving omitted fields untouched.
    pub fn apply(&mut self, patch: &RoutinePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }
}
