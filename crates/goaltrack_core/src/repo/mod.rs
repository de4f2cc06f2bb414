//! Repository layer abstractions and in-memory implementations.
//!
//! # Responsibility
//! - Define the user directory contract used by services.
//! - Isolate storage shape from use-case orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`).
//! - Nothing is persisted beyond the process lifetime.

pub mod user_repo;
