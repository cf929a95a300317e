//! Request coordination.
//!
//! Each operation runs its checks in a fixed order and stops at the first
//! failure: time normalization and interval checks run before the store is
//! touched, the event reference check runs before any task write, and only
//! then is the write executed. Updates and deletes that affect no rows are
//! reported as not found.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use entities::{
    Event, EventPatch, NewEvent, NewRoutine, NewTask, Routine, RoutinePatch, Task, TaskPatch,
    TaskPatchRequest, TaskRequest, User, UserPatch,
};
use schedule_store::ScheduleStore;

use crate::error::{ServerError, ServerResult};
use crate::services::{EventReferenceValidator, TimeNormalizer};

/// Orchestrates validation, normalization and persistence for every entity.
pub struct ScheduleCoordinator<S> {
    store: Arc<S>,
    normalizer: TimeNormalizer,
}

impl<S> Clone for ScheduleCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            normalizer: self.normalizer,
        }
    }
}

impl<S: ScheduleStore> ScheduleCoordinator<S> {
    /// Creates a coordinator over a shared store handle.
    pub fn new(store: Arc<S>, normalizer: TimeNormalizer) -> Self {
        Self { store, normalizer }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the time normalizer.
    pub fn normalizer(&self) -> &TimeNormalizer {
        &self.normalizer
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Creates a user. A taken username is a constraint violation.
    pub async fn create_user(&self, user: User) -> ServerResult<User> {
        let username = self.store.create_user(&user).await?;
        tracing::info!(%username, "User created");
        self.get_user(&username).await
    }

    /// Lists all users.
    pub async fn list_users(&self) -> ServerResult<Vec<User>> {
        Ok(self.store.list_users().await?)
    }

    /// Gets a user by username.
    pub async fn get_user(&self, username: &str) -> ServerResult<User> {
        self.store
            .get_user(username)
            .await?
            .ok_or_else(|| ServerError::not_found("User", username))
    }

    /// Updates a user's email and/or birthday.
    pub async fn update_user(&self, username: &str, patch: UserPatch) -> ServerResult<User> {
        let affected = self.store.update_user(username, &patch).await?;
        if affected == 0 {
            return Err(ServerError::not_found("User", username));
        }
        tracing::info!(%username, "User updated");
        self.get_user(username).await
    }

    /// Deletes a user.
    pub async fn delete_user(&self, username: &str) -> ServerResult<()> {
        if self.store.delete_user(username).await? == 0 {
            return Err(ServerError::not_found("User", username));
        }
        tracing::info!(%username, "User deleted");
        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Creates an event.
    pub async fn create_event(&self, event: NewEvent) -> ServerResult<Event> {
        let id = self.store.create_event(&event).await?;
        tracing::info!(event_id = id, "Event created");
        self.get_event(id).await
    }

    /// Lists all events.
    pub async fn list_events(&self) -> ServerResult<Vec<Event>> {
        Ok(self.store.list_events().await?)
    }

    /// Gets an event by id.
    pub async fn get_event(&self, id: i64) -> ServerResult<Event> {
        self.store
            .get_event(id)
            .await?
            .ok_or_else(|| ServerError::not_found("Event", id))
    }

    /// Updates an event's title and/or image.
    pub async fn update_event(&self, id: i64, patch: EventPatch) -> ServerResult<Event> {
        if self.store.update_event(id, &patch).await? == 0 {
            return Err(ServerError::not_found("Event", id));
        }
        tracing::info!(event_id = id, "Event updated");
        self.get_event(id).await
    }

    /// Deletes an event. Fails while tasks still reference it.
    pub async fn delete_event(&self, id: i64) -> ServerResult<()> {
        if self.store.delete_event(id).await? == 0 {
            return Err(ServerError::not_found("Event", id));
        }
        tracing::info!(event_id = id, "Event deleted");
        Ok(())
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Creates a task from wall-clock times in the configured zone.
    pub async fn create_task(&self, request: TaskRequest) -> ServerResult<Task> {
        let anchor = self.normalizer.today();
        let start_time = self.normalizer.normalize_on(&request.start_time, anchor)?;
        let end_time = self.normalizer.normalize_on(&request.end_time, anchor)?;
        ensure_ordered(start_time, end_time)?;

        EventReferenceValidator::new(self.store.as_ref())
            .check(request.event_id)
            .await?;

        let task = NewTask {
            start_time,
            end_time,
            event_id: request.event_id,
        };
        let id = self.store.create_task(&task).await?;
        tracing::info!(task_id = id, event_id = task.event_id, "Task created");
        self.get_task(id).await
    }

    /// Lists all tasks.
    pub async fn list_tasks(&self) -> ServerResult<Vec<Task>> {
        Ok(self.store.list_tasks().await?)
    }

    /// Gets a task by id.
    pub async fn get_task(&self, id: i64) -> ServerResult<Task> {
        self.store
            .get_task(id)
            .await?
            .ok_or_else(|| ServerError::not_found("Task", id))
    }

    /// Updates a task's times and/or re-points it at another event.
    ///
    /// When only one bound is given, the stored task supplies the other for
    /// the interval check.
    pub async fn update_task(&self, id: i64, request: TaskPatchRequest) -> ServerResult<Task> {
        let anchor = self.normalizer.today();
        let normalize = |raw: Option<String>| {
            raw.map(|raw| self.normalizer.normalize_on(&raw, anchor))
                .transpose()
        };
        let patch = TaskPatch {
            start_time: normalize(request.start_time)?,
            end_time: normalize(request.end_time)?,
            event_id: request.event_id,
        };

        match (patch.start_time, patch.end_time) {
            (Some(start_time), Some(end_time)) => ensure_ordered(start_time, end_time)?,
            (None, None) => {}
            _ => {
                let mut merged = self.get_task(id).await?;
                merged.apply(&patch);
                ensure_ordered(merged.start_time, merged.end_time)?;
            }
        }

        if let Some(event_id) = patch.event_id {
            EventReferenceValidator::new(self.store.as_ref())
                .check(event_id)
                .await?;
        }

        if self.store.update_task(id, &patch).await? == 0 {
            return Err(ServerError::not_found("Task", id));
        }
        tracing::info!(task_id = id, "Task updated");
        self.get_task(id).await
    }

    /// Deletes a task.
    pub async fn delete_task(&self, id: i64) -> ServerResult<()> {
        if self.store.delete_task(id).await? == 0 {
            return Err(ServerError::not_found("Task", id));
        }
        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }

    // =========================================================================
    // Routines
    // =========================================================================

    /// Creates a routine.
    pub async fn create_routine(&self, routine: NewRoutine) -> ServerResult<Routine> {
        let id = self.store.create_routine(&routine).await?;
        tracing::info!(routine_id = id, "Routine created");
        self.get_routine(id).await
    }

    /// Lists all routines.
    pub async fn list_routines(&self) -> ServerResult<Vec<Routine>> {
        Ok(self.store.list_routines().await?)
    }

    /// Gets a routine by id.
    pub async fn get_routine(&self, id: i64) -> ServerResult<Routine> {
        self.store
            .get_routine(id)
            .await?
            .ok_or_else(|| ServerError::not_found("Routine", id))
    }

    /// Updates a routine's name and/or description.
    pub async fn update_routine(&self, id: i64, patch: RoutinePatch) -> ServerResult<Routine> {
        if self.store.update_routine(id, &patch).await? == 0 {
            return Err(ServerError::not_found("Routine", id));
        }
        tracing::info!(routine_id = id, "Routine updated");
        self.get_routine(id).await
    }

    /// Deletes a routine.
    pub async fn delete_routine(&self, id: i64) -> ServerResult<()> {
        if self.store.delete_routine(id).await? == 0 {
            return Err(ServerError::not_found("Routine", id));
        }
        tracing::info!(routine_id = id, "Routine deleted");
        Ok(())
    }
}

/// Rejects intervals that end before they start. Zero-length slots are fine.
fn ensure_ordered(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> ServerResult<()> {
    if end_time < start_time {
        return Err(ServerError::InvalidInterval(format!(
            "end time {end_time} is before start time {start_time}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use schedule_store::{MemoryScheduleStore, TaskRepository};

    use super::*;

    fn coordinator() -> ScheduleCoordinator<MemoryScheduleStore> {
        ScheduleCoordinator::new(
            Arc::new(MemoryScheduleStore::new()),
            TimeNormalizer::new("America/New_York").unwrap(),
        )
    }

    fn task_request(start: &str, end: &str, event_id: i64) -> TaskRequest {
        TaskRequest {
            start_time: start.to_string(),
            end_time: end.to_string(),
            event_id,
        }
    }

    async fn standup(coordinator: &ScheduleCoordinator<MemoryScheduleStore>) -> Event {
        coordinator
            .create_event(NewEvent::new("Standup", "x.png"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_task_stores_canonical_instants() {
        let coordinator = coordinator();
        let event = standup(&coordinator).await;

        let task = coordinator
            .create_task(task_request(
                "2024-05-01T09:00:00",
                "2024-05-01T09:15:00",
                event.id,
            ))
            .await
            .unwrap();

        assert_eq!(task.start_time, Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap());
        assert_eq!(task.end_time, Utc.with_ymd_and_hms(2024, 5, 1, 13, 15, 0).unwrap());
        assert_eq!(coordinator.get_task(task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_create_task_with_time_of_day() {
        let coordinator = coordinator();
        let event = standup(&coordinator).await;

        let task = coordinator
            .create_task(task_request("09:00:00", "09:15:00", event.id))
            .await
            .unwrap();

        let zone = coordinator.normalizer().zone();
        let local_start = task.start_time.with_timezone(&zone);
        assert_eq!(local_start.format("%H:%M:%S").to_string(), "09:00:00");
        assert_eq!((task.end_time - task.start_time).num_minutes(), 15);
    }

    #[tokio::test]
    async fn test_create_task_with_unknown_event_writes_nothing() {
        let coordinator = coordinator();

        let err = coordinator
            .create_task(task_request("09:00:00", "09:15:00", 42))
            .await
            .unwrap_err();

        assert!(matches!(err, ServerError::InvalidReference(_)));
        assert!(coordinator.store().list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_task_rejects_bad_times_before_reference_check() {
        let coordinator = coordinator();

        let err = coordinator
            .create_task(task_request("nine", "09:15:00", 42))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidTimeFormat(_)));

        let err = coordinator
            .create_task(task_request("10:00:00", "09:15:00", 42))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidInterval(_)));
    }

    #[tokio::test]
    async fn test_update_task_checks_new_event() {
        let coordinator = coordinator();
        let event = standup(&coordinator).await;
        let task = coordinator
            .create_task(task_request("09:00", "09:15", event.id))
            .await
            .unwrap();

        let err = coordinator
            .update_task(
                task.id,
                TaskPatchRequest {
                    event_id: Some(42),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServerError::InvalidReference(_)));
        assert_eq!(coordinator.get_task(task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_update_task_single_bound_uses_stored_other_bound() {
        let coordinator = coordinator();
        let event = standup(&coordinator).await;
        let task = coordinator
            .create_task(task_request(
                "2024-05-01T09:00:00",
                "2024-05-01T09:15:00",
                event.id,
            ))
            .await
            .unwrap();

        let err = coordinator
            .update_task(
                task.id,
                TaskPatchRequest {
                    end_time: Some("2024-05-01T08:00:00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidInterval(_)));

        let updated = coordinator
            .update_task(
                task.id,
                TaskPatchRequest {
                    end_time: Some("2024-05-01T10:00:00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.start_time, task.start_time);
        assert_eq!(
            updated.end_time,
            Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_keys_are_not_found() {
        let coordinator = coordinator();

        let errors = [
            coordinator.delete_user("nobody").await.unwrap_err(),
            coordinator.delete_event(1).await.unwrap_err(),
            coordinator.delete_task(1).await.unwrap_err(),
            coordinator.delete_routine(1).await.unwrap_err(),
            coordinator
                .update_user("nobody", UserPatch::default())
                .await
                .unwrap_err(),
            coordinator
                .update_event(1, EventPatch::default())
                .await
                .unwrap_err(),
            coordinator
                .update_task(1, TaskPatchRequest::default())
                .await
                .unwrap_err(),
            coordinator
                .update_routine(1, RoutinePatch::default())
                .await
                .unwrap_err(),
        ];

        for err in errors {
            assert!(matches!(err, ServerError::NotFound(_)), "{err}");
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint_violation() {
        let coordinator = coordinator();
        let user = User::new("abc", "a@b.com", NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());

        coordinator.create_user(user.clone()).await.unwrap();
        let err = coordinator.create_user(user.clone()).await.unwrap_err();

        assert!(matches!(err, ServerError::ConstraintViolation(_)));
        assert_eq!(coordinator.get_user("abc").await.unwrap(), user);
    }
}
