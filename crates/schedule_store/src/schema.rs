//! Table definitions, applied idempotently when a store is initialized.
//!
//! `tasks.event_id` is a real foreign key so the database has the last word
//! on dangling references. Its default `NO ACTION` rule blocks deleting an
//! event that tasks still point at.

pub(crate) const SQLITE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY NOT NULL,
        email TEXT NOT NULL,
        birthday TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        image TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        event_id INTEGER NOT NULL REFERENCES events (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_event_id ON tasks (event_id)",
    r#"
    CREATE TABLE IF NOT EXISTS routines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
];

pub(crate) const POSTGRES_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        seq BIGSERIAL NOT NULL,
        username TEXT PRIMARY KEY,
        email TEXT NOT NULL,
        birthday DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        image TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id BIGSERIAL PRIMARY KEY,
        start_time TIMESTAMPTZ NOT NULL,
        end_time TIMESTAMPTZ NOT NULL,
        event_id BIGINT NOT NULL REFERENCES events (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_event_id ON tasks (event_id)",
    r#"
    CREATE TABLE IF NOT EXISTS routines (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
];
