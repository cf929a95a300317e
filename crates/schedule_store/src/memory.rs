//! In-memory schedule store implementation for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use entities::{
    Event, EventPatch, NewEvent, NewRoutine, NewTask, Routine, RoutinePatch, Task, TaskPatch,
    User, UserPatch,
};
use tokio::sync::RwLock;

use crate::{
    EventRepository, RoutineRepository, StoreError, StoreResult, TaskRepository, UserRepository,
};

/// Rows keyed by a store-assigned id.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn insert(&mut self, build: impl FnOnce(i64) -> T) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, build(id));
        id
    }
}

/// In-memory schedule store.
///
/// Enforces the same uniqueness and foreign-key rules as the SQL stores.
/// Locks are always taken events-before-tasks.
#[derive(Debug, Default)]
pub struct MemoryScheduleStore {
    users: RwLock<Vec<User>>,
    events: RwLock<Table<Event>>,
    tasks: RwLock<Table<Task>>,
    routines: RwLock<Table<Routine>>,
}

impl MemoryScheduleStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryScheduleStore {
    async fn create_user(&self, user: &User) -> StoreResult<String> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::constraint(
                "User",
                format!("username {} already exists", user.username),
            ));
        }
        users.push(user.clone());
        Ok(user.username.clone())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn get_user(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, username: &str, patch: &UserPatch) -> StoreResult<u64> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.username == username) {
            Some(user) => {
                user.apply(patch);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_user(&self, username: &str) -> StoreResult<u64> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.username != username);
        Ok((before - users.len()) as u64)
    }
}

#[async_trait]
impl EventRepository for MemoryScheduleStore {
    async fn create_event(&self, event: &NewEvent) -> StoreResult<i64> {
        let mut events = self.events.write().await;
        Ok(events.insert(|id| event.clone().into_event(id)))
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        Ok(self.events.read().await.rows.values().cloned().collect())
    }

    async fn get_event(&self, id: i64) -> StoreResult<Option<Event>> {
        Ok(self.events.read().await.rows.get(&id).cloned())
    }

    async fn event_exists(&self, id: i64) -> StoreResult<bool> {
        Ok(self.events.read().await.rows.contains_key(&id))
    }

    async fn update_event(&self, id: i64, patch: &EventPatch) -> StoreResult<u64> {
        let mut events = self.events.write().await;
        match events.rows.get_mut(&id) {
            Some(event) => {
                event.apply(patch);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_event(&self, id: i64) -> StoreResult<u64> {
        let mut events = self.events.write().await;
        let tasks = self.tasks.read().await;
        if tasks.rows.values().any(|t| t.event_id == id) {
            return Err(StoreError::constraint(
                "Event",
                format!("event {id} is still referenced by tasks"),
            ));
        }
        Ok(events.rows.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl TaskRepository for MemoryScheduleStore {
    async fn create_task(&self, task: &NewTask) -> StoreResult<i64> {
        let events = self.events.read().await;
        let mut tasks = self.tasks.write().await;
        if !events.rows.contains_key(&task.event_id) {
            return Err(StoreError::constraint(
                "Task",
                format!("event {} does not exist", task.event_id),
            ));
        }
        Ok(tasks.insert(|id| task.clone().into_task(id)))
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.read().await.rows.values().cloned().collect())
    }

    async fn get_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.tasks.read().await.rows.get(&id).cloned())
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> StoreResult<u64> {
        let events = self.events.read().await;
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.rows.get_mut(&id) else {
            return Ok(0);
        };
        if let Some(event_id) = patch.event_id {
            if !events.rows.contains_key(&event_id) {
                return Err(StoreError::constraint(
                    "Task",
                    format!("event {event_id} does not exist"),
                ));
            }
        }
        task.apply(patch);
        Ok(1)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<u64> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.rows.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl RoutineRepository for MemoryScheduleStore {
    async fn create_routine(&self, routine: &NewRoutine) -> StoreResult<i64> {
        let mut routines = self.routines.write().await;
        Ok(routines.insert(|id| routine.clone().into_routine(id)))
    }

    async fn list_routines(&self) -> StoreResult<Vec<Routine>> {
        Ok(self.routines.read().await.rows.values().cloned().collect())
    }

    async fn get_routine(&self, id: i64) -> StoreResult<Option<Routine>> {
        Ok(self.routines.read().await.rows.get(&id).cloned())
    }

    async fn update_routine(&self, id: i64, patch: &RoutinePatch) -> StoreResult<u64> {
        let mut routines = self.routines.write().await;
        match routines.rows.get_mut(&id) {
            Some(routine) => {
                routine.apply(patch);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_routine(&self, id: i64) -> StoreResult<u64> {
        let mut routines = self.routines.write().await;
        Ok(routines.rows.remove(&id).map_or(0, |_| 1))
    }
}
