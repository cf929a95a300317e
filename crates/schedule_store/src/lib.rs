//! Storage for the schedule backend.
//!
//! This crate provides one repository trait per entity (users, events, tasks
//! and routines) and the [`ScheduleStore`] capability that bundles them. It
//! ships an in-memory store for tests, a SQLite store for single-node
//! deployments, and a PostgreSQL store.
//!
//! Repositories report what happened, not what it means: a lookup that
//! finds nothing returns `None`, and updates and deletes return the number of
//! affected rows. Deciding that zero rows is a "not found" is left to the
//! caller.

mod error;
mod memory;
mod postgres;
mod rows;
mod schema;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use sqlite::*;
pub use traits::*;
