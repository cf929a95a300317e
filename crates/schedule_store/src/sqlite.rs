//! SQLite schedule store (single-node deployments and tests).

use std::str::FromStr;

use async_trait::async_trait;
use entities::{
    Event, EventPatch, NewEvent, NewRoutine, NewTask, Routine, RoutinePatch, Task, TaskPatch,
    User, UserPatch,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{
    rows::{EventRow, RoutineRow, TaskRow, UserRow},
    schema::SQLITE_SCHEMA,
    EventRepository, RoutineRepository, StoreError, StoreResult, TaskRepository, UserRepository,
};

/// Schedule store backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteScheduleStore {
    pool: Pool<Sqlite>,
}

impl SqliteScheduleStore {
    /// Wraps an existing pool. Call [`init`](Self::init) before use.
    ///
    /// Foreign key enforcement is a per-connection setting in SQLite; pools
    /// not built by [`connect`](Self::connect) must enable it themselves.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `url` and creates the
    /// tables.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::Unavailable)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(StoreError::Unavailable)?;

        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// The pool is pinned to a single connection that is never recycled,
    /// since every SQLite in-memory connection is its own database.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(StoreError::Unavailable)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(StoreError::Unavailable)?;

        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Creates the tables if they do not exist.
    pub async fn init(&self) -> StoreResult<()> {
        for statement in SQLITE_SCHEMA {
            sqlx::query(*statement)
                .execute(&self.pool)
                .await
                .map_err(StoreError::Unavailable)?;
        }
        tracing::debug!("SQLite schema ready");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteScheduleStore {
    async fn create_user(&self, user: &User) -> StoreResult<String> {
        sqlx::query("INSERT INTO users (username, email, birthday) VALUES (?, ?, ?)")
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.birthday)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("User", e))?;

        Ok(user.username.clone())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as("SELECT username, email, birthday FROM users ORDER BY rowid")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("User", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, username: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT username, email, birthday FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("User", e))?;

        Ok(row.map(User::from))
    }

    async fn update_user(&self, username: &str, patch: &UserPatch) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE users
             SET email = COALESCE(?, email), birthday = COALESCE(?, birthday)
             WHERE username = ?",
        )
        .bind(&patch.email)
        .bind(patch.birthday)
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("User", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_user(&self, username: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("User", e))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl EventRepository for SqliteScheduleStore {
    async fn create_event(&self, event: &NewEvent) -> StoreResult<i64> {
        let result = sqlx::query("INSERT INTO events (title, image) VALUES (?, ?)")
            .bind(&event.title)
            .bind(&event.image)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Event", e))?;

        Ok(result.last_insert_rowid())
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as("SELECT id, title, image FROM events ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Event", e))?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn get_event(&self, id: i64) -> StoreResult<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as("SELECT id, title, image FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Event", e))?;

        Ok(row.map(Event::from))
    }

    async fn event_exists(&self, id: i64) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Event", e))
    }

    async fn update_event(&self, id: i64, patch: &EventPatch) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE events SET title = COALESCE(?, title), image = COALESCE(?, image)
             WHERE id = ?",
        )
        .bind(&patch.title)
        .bind(&patch.image)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("Event", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_event(&self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Event", e))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl TaskRepository for SqliteScheduleStore {
    async fn create_task(&self, task: &NewTask) -> StoreResult<i64> {
        let result =
            sqlx::query("INSERT INTO tasks (start_time, end_time, event_id) VALUES (?, ?, ?)")
                .bind(task.start_time)
                .bind(task.end_time)
                .bind(task.event_id)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("Task", e))?;

        Ok(result.last_insert_rowid())
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> =
            sqlx::query_as("SELECT id, start_time, end_time, event_id FROM tasks ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("Task", e))?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn get_task(&self, id: i64) -> StoreResult<Option<Task>> {
        let row: Option<TaskRow> =
            sqlx::query_as("SELECT id, start_time, end_time, event_id FROM tasks WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("Task", e))?;

        Ok(row.map(Task::from))
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE tasks
             SET start_time = COALESCE(?, start_time),
                 end_time = COALESCE(?, end_time),
                 event_id = COALESCE(?, event_id)
             WHERE id = ?",
        )
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(patch.event_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("Task", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_task(&self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Task", e))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RoutineRepository for SqliteScheduleStore {
    async fn create_routine(&self, routine: &NewRoutine) -> StoreResult<i64> {
        let result = sqlx::query("INSERT INTO routines (name, description) VALUES (?, ?)")
            .bind(&routine.name)
            .bind(&routine.description)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Routine", e))?;

        Ok(result.last_insert_rowid())
    }

    async fn list_routines(&self) -> StoreResult<Vec<Routine>> {
        let rows: Vec<RoutineRow> =
            sqlx::query_as("SELECT id, name, description FROM routines ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("Routine", e))?;

        Ok(rows.into_iter().map(Routine::from).collect())
    }

    async fn get_routine(&self, id: i64) -> StoreResult<Option<Routine>> {
        let row: Option<RoutineRow> =
            sqlx::query_as("SELECT id, name, description FROM routines WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("Routine", e))?;

        Ok(row.map(Routine::from))
    }

    async fn update_routine(&self, id: i64, patch: &RoutinePatch) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE routines
             SET name = COALESCE(?, name), description = COALESCE(?, description)
             WHERE id = ?",
        )
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("Routine", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_routine(&self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM routines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Routine", e))?;

        Ok(result.rows_affected())
    }
}
