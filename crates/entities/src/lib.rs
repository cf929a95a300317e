//! Core entity definitions for the schedule backend.
//!
//! This crate defines the data types shared by the store and the server:
//! users, events, the tasks attached to events, and routines. Each entity
//! comes with the payload used to create it and a patch type for partial
//! updates, where an omitted field means "leave as is".

mod event;
mod routine;
mod task;
mod user;

pub use event::*;
pub use routine::*;
pub use task::*;
pub use user::*;
