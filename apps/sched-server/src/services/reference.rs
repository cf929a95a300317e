//! Event reference checks for task writes.

use schedule_store::EventRepository;

use crate::error::{ServerError, ServerResult};

/// Confirms that a task's event exists before the task is written.
///
/// This is a separate round trip from the write itself. The foreign key in
/// the database remains the final authority; an event removed between the
/// check and the write surfaces as a constraint violation instead.
pub struct EventReferenceValidator<'a, S: ?Sized> {
    events: &'a S,
}

impl<'a, S: EventRepository + ?Sized> EventReferenceValidator<'a, S> {
    /// Creates a validator over the given event repository.
    pub fn new(events: &'a S) -> Self {
        Self { events }
    }

    /// Fails with `InvalidReference` if no event has this id.
    pub async fn check(&self, event_id: i64) -> ServerResult<()> {
        if self.events.event_exists(event_id).await? {
            Ok(())
        } else {
            tracing::debug!(event_id, "Rejected task with unknown event");
            Err(ServerError::InvalidReference(format!(
                "event {event_id} does not exist"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use entities::NewEvent;
    use schedule_store::MemoryScheduleStore;

    use super::*;

    #[tokio::test]
    async fn test_existing_event_passes() {
        let store = MemoryScheduleStore::new();
        let id = store
            .create_event(&NewEvent::new("Standup", "x.png"))
            .await
            .unwrap();

        EventReferenceValidator::new(&store).check(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_event_is_invalid_reference() {
        let store = MemoryScheduleStore::new();

        let err = EventReferenceValidator::new(&store).check(42).await.unwrap_err();

        assert!(matches!(err, ServerError::InvalidReference(_)));
        assert_eq!(err.to_string(), "Invalid reference: event 42 does not exist");
    }
}
