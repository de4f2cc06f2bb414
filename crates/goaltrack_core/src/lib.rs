//! Core domain logic for GoalTrack.
//! This crate is the single source of truth for goal and friend invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogLevel, LoggingConfig,
    LoggingError,
};
pub use model::goal::{CompletionError, Goal, GoalId};
pub use model::record::{GoalRecord, UserRecord};
pub use model::user::{
    Collection, FriendPolicy, GoalEntry, InvalidReference, ProfilePicture, User, UserError,
    UserId,
};
pub use repo::user_repo::{InMemoryUserRepository, RepoError, RepoResult, UserRepository};
pub use service::user_service::{ServiceResult, UserService, UserServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
