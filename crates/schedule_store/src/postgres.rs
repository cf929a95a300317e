//! PostgreSQL schedule store (production deployments).

use async_trait::async_trait;
use entities::{
    Event, EventPatch, NewEvent, NewRoutine, NewTask, Routine, RoutinePatch, Task, TaskPatch,
    User, UserPatch,
};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::{
    rows::{EventRow, RoutineRow, TaskRow, UserRow},
    schema::POSTGRES_SCHEMA,
    EventRepository, RoutineRepository, StoreError, StoreResult, TaskRepository, UserRepository,
};

/// Schedule store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresScheduleStore {
    pool: Pool<Postgres>,
}

impl PostgresScheduleStore {
    /// Wraps an existing pool. Call [`init`](Self::init) before use.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connects to `url` and creates the tables.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(StoreError::Unavailable)?;

        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    /// Creates the tables if they do not exist.
    pub async fn init(&self) -> StoreResult<()> {
        for statement in POSTGRES_SCHEMA {
            sqlx::query(*statement)
                .execute(&self.pool)
                .await
                .map_err(StoreError::Unavailable)?;
        }
        tracing::debug!("PostgreSQL schema ready");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresScheduleStore {
    async fn create_user(&self, user: &User) -> StoreResult<String> {
        sqlx::query("INSERT INTO users (username, email, birthday) VALUES ($1, $2, $3)")
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
            sqlx::query_as("SELECT username, email, birthday FROM users ORDER BY seq")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("User", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, username: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT username, email, birthday FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("User", e))?;

        Ok(row.map(User::from))
    }

    async fn update_user(&self, username: &str, patch: &UserPatch) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE users
             SET email = COALESCE($1, email), birthday = COALESCE($2, birthday)
             WHERE username = $3",
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
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("User", e))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl EventRepository for PostgresScheduleStore {
    async fn create_event(&self, event: &NewEvent) -> StoreResult<i64> {
        sqlx::query_scalar("INSERT INTO events (title, image) VALUES ($1, $2) RETURNING id")
            .bind(&event.title)
            .bind(&event.image)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Event", e))
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as("SELECT id, title, image FROM events ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Event", e))?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn get_event(&self, id: i64) -> StoreResult<Option<Event>> {
        let row: Option<EventRow> =
            sqlx::query_as("SELECT id, title, image FROM events WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("Event", e))?;

        Ok(row.map(Event::from))
    }

    async fn event_exists(&self, id: i64) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Event", e))
    }

    async fn update_event(&self, id: i64, patch: &EventPatch) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE events SET title = COALESCE($1, title), image = COALESCE($2, image)
             WHERE id = $3",
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
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Event", e))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl TaskRepository for PostgresScheduleStore {
    async fn create_task(&self, task: &NewTask) -> StoreResult<i64> {
        sqlx::query_scalar(
            "INSERT INTO tasks (start_time, end_time, event_id) VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(task.start_time)
        .bind(task.end_time)
        .bind(task.event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("Task", e))
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
            sqlx::query_as("SELECT id, start_time, end_time, event_id FROM tasks WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("Task", e))?;

        Ok(row.map(Task::from))
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE tasks
             SET start_time = COALESCE($1, start_time),
                 end_time = COALESCE($2, end_time),
                 event_id = COALESCE($3, event_id)
             WHERE id = $4",
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
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Task", e))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RoutineRepository for PostgresScheduleStore {
    async fn create_routine(&self, routine: &NewRoutine) -> StoreResult<i64> {
        sqlx::query_scalar(
            "INSERT INTO routines (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&routine.name)
        .bind(&routine.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx("Routine", e))
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
            sqlx::query_as("SELECT id, name, description FROM routines WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::from_sqlx("Routine", e))?;

        Ok(row.map(Routine::from))
    }

    async fn update_routine(&self, id: i64, patch: &RoutinePatch) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE routines
             SET name = COALESCE($1, name), description = COALESCE($2, description)
             WHERE id = $3",
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
        let result = sqlx::query("DELETE FROM routines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx("Routine", e))?;

        Ok(result.rows_affected())
    }
}
