//! Domain model for goals, users and their export records.
//!
//! # Responsibility
//! - Define the data structures every use case operates on.
//! - Enforce index bounds and friend-link rules at the model boundary.
//!
//! # Invariants
//! - Users own their goals; friends are referenced by `UserId` only.
//! - Every fallible mutation returns `Result` and is all-or-nothing.

pub mod goal;
pub mod record;
pub mod user;
