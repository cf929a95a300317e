//! Repository trait definitions.

use async_trait::async_trait;
use entities::{
    Event, EventPatch, NewEvent, NewRoutine, NewTask, Routine, RoutinePatch, Task, TaskPatch,
    User, UserPatch,
};

use crate::StoreResult;

/// Storage operations for users, keyed by username.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user and returns its username.
    async fn create_user(&self, user: &User) -> StoreResult<String>;

    /// Lists all users in insertion order.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Gets a user by username.
    async fn get_user(&self, username: &str) -> StoreResult<Option<User>>;

    /// Applies a partial update and returns the number of affected rows.
    async fn update_user(&self, username: &str, patch: &UserPatch) -> StoreResult<u64>;

    /// Deletes a user and returns the number of affected rows.
    async fn delete_user(&self, username: &str) -> StoreResult<u64>;
}

/// Storage operations for events, keyed by id.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Creates an event and returns its id.
    async fn create_event(&self, event: &NewEvent) -> StoreResult<i64>;

    /// Lists all events ordered by id.
    async fn list_events(&self) -> StoreResult<Vec<Event>>;

    /// Gets an event by id.
    async fn get_event(&self, id: i64) -> StoreResult<Option<Event>>;

    /// Returns true if an event with this id exists.
    async fn event_exists(&self, id: i64) -> StoreResult<bool>;

    /// Applies a partial update and returns the number of affected rows.
    async fn update_event(&self, id: i64, patch: &EventPatch) -> StoreResult<u64>;

    /// Deletes an event and returns the number of affected rows.
    ///
    /// Fails with a constraint violation while tasks still reference it.
    async fn delete_event(&self, id: i64) -> StoreResult<u64>;
}

/// Storage operations for tasks, keyed by id.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Creates a task and returns its id.
    async fn create_task(&self, task: &NewTask) -> StoreResult<i64>;

    /// Lists all tasks ordered by id.
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Gets a task by id.
    async fn get_task(&self, id: i64) -> StoreResult<Option<Task>>;

    /// Applies a partial update and returns the number of affected rows.
    async fn update_task(&self, id: i64, patch: &TaskPatch) -> StoreResult<u64>;

    /// Deletes a task and returns the number of affected rows.
    async fn delete_task(&self, id: i64) -> StoreResult<u64>;
}

/// Storage operations for routines, keyed by id.
#[async_trait]
pub trait RoutineRepository: Send + Sync {
    /// Creates a routine and returns its id.
    async fn create_routine(&self, routine: &NewRoutine) -> StoreResult<i64>;

    /// Lists all routines ordered by id.
    async fn list_routines(&self) -> StoreResult<Vec<Routine>>;

    /// Gets a routine by id.
    async fn get_routine(&self, id: i64) -> StoreResult<Option<Routine>>;

    /// Applies a partial update and returns the number of affected rows.
    async fn update_routine(&self, id: i64, patch: &RoutinePatch) -> StoreResult<u64>;

    /// Deletes a routine and returns the number of affected rows.
    async fn delete_routine(&self, id: i64) -> StoreResult<u64>;
}

/// The full store capability handed to the server.
pub trait ScheduleStore:
    UserRepository + EventRepository + TaskRepository + RoutineRepository
{
}

impl<T> ScheduleStore for T where
    T: UserRepository + EventRepository + TaskRepository + RoutineRepository
{
}
