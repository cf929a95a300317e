//! Database rows shared by the SQL stores.

use chrono::{DateTime, NaiveDate, Utc};
use entities::{Event, Routine, Task, User};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub username: String,
    pub email: String,
    pub birthday: NaiveDate,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            username: row.username,
            email: row.email,
            birthday: row.birthday,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct EventRow {
    pub id: i64,
    pub title: String,
    pub image: String,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            image: row.image,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TaskRow {
    pub id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub event_id: i64,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            start_time: row.start_time,
            end_time: row.end_time,
            event_id: row.event_id,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RoutineRow {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl From<RoutineRow> for Routine {
    fn from(row: RoutineRow) -> Self {
        Routine {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}
