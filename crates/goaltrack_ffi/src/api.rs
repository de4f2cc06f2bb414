//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose goal-list, history and friend use cases to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` and a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - All calls share one process-wide session; data is lost on exit.

use crate::session::{
    ActionResponse, FriendListResponse, GoalHistoryResponse, GoalListResponse,
    GoalProgressResponse, Session,
};
use goaltrack_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
};
use log::error;
use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard};

static SESSION: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::new()));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Registers a user and makes it the signed-in session user.
///
/// The password is stored as given; it is not verified.
#[flutter_rust_bridge::frb(sync)]
pub fn session_start(username: String, password: String) -> ActionResponse {
    match lock_session() {
        Ok(mut session) => session.start(username.as_str(), password.as_str()),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Registers another user (for example, someone to befriend).
#[flutter_rust_bridge::frb(sync)]
pub fn user_register(username: String, password: String) -> ActionResponse {
    with_session(ActionResponse::failure, |session| {
        session.register(username.as_str(), password.as_str())
    })
}

/// Rows for the goal table, in list order.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_list() -> GoalListResponse {
    with_session(
        |message| GoalListResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
        |session| session.goal_list(),
    )
}

/// Completion history of the goal at `index`.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_history(index: u32) -> GoalHistoryResponse {
    with_session(
        |message| GoalHistoryResponse {
            ok: false,
            dates: Vec::new(),
            message,
        },
        |session| session.goal_history(index),
    )
}

/// Completion percentage of the goal at `index`, evaluated now.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_progress(index: u32) -> GoalProgressResponse {
    with_session(
        |message| GoalProgressResponse {
            ok: false,
            percentage: None,
            message,
        },
        |session| session.goal_progress(index),
    )
}

/// Adds a goal from the add-goal form. Blank names are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_add(name: String) -> ActionResponse {
    with_session(ActionResponse::failure, |session| {
        session.goal_add(name.as_str())
    })
}

/// Checks off the goal at `index` with the current time.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_check_off(index: u32) -> ActionResponse {
    with_session(ActionResponse::failure, |session| {
        session.goal_check_off(index)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_remove(index: u32) -> ActionResponse {
    with_session(ActionResponse::failure, |session| session.goal_remove(index))
}

/// Links an existing user, by id, into the session user's friends.
#[flutter_rust_bridge::frb(sync)]
pub fn friend_add(user_id: String) -> ActionResponse {
    with_session(ActionResponse::failure, |session| {
        session.friend_add(user_id.as_str())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn friend_remove(index: u32) -> ActionResponse {
    with_session(ActionResponse::failure, |session| {
        session.friend_remove(index)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn friend_list() -> FriendListResponse {
    with_session(
        |message| FriendListResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
        |session| session.friend_list(),
    )
}

/// Session user record as JSON (returned in `message`), without password.
#[flutter_rust_bridge::frb(sync)]
pub fn export_session_json() -> ActionResponse {
    with_session(ActionResponse::failure, |session| session.export_json())
}

fn lock_session() -> Result<MutexGuard<'static, Session>, String> {
    SESSION.lock().map_err(|_| {
        error!("event=session_lock module=ffi status=error error_code=poisoned");
        "session state is unavailable".to_string()
    })
}

fn with_session<T>(on_error: impl FnOnce(String) -> T, f: impl FnOnce(&Session) -> T) -> T {
    match lock_session() {
        Ok(session) => f(&session),
        Err(message) => on_error(message),
    }
}
