//! UI session state behind the FFI surface.
//!
//! # Responsibility
//! - Hold the in-memory user directory and the signed-in user.
//! - Translate service results into flat, string-friendly envelopes.
//!
//! # Invariants
//! - No method panics; every failure becomes an envelope with `ok = false`.
//! - Goal and friend positions are list indices as rendered by the UI.

use chrono::SecondsFormat;
use goaltrack_core::{
    InMemoryUserRepository, ServiceResult, UserId, UserService, UserServiceError,
};

/// Goal list row for table rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalRow {
    pub index: u32,
    pub goal_id: String,
    pub name: String,
    pub completion_count: u32,
}

/// Goal list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalListResponse {
    pub ok: bool,
    pub items: Vec<GoalRow>,
    pub message: String,
}

/// Completion history envelope; dates are RFC 3339 UTC strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalHistoryResponse {
    pub ok: bool,
    pub dates: Vec<String>,
    pub message: String,
}

/// Completion percentage envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgressResponse {
    pub ok: bool,
    pub percentage: Option<f64>,
    pub message: String,
}

/// Friend list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRow {
    pub index: u32,
    pub user_id: String,
    pub username: String,
    pub goal_count: u32,
}

/// Friend list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendListResponse {
    pub ok: bool,
    pub items: Vec<FriendRow>,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Created or affected id, when the action has one.
    pub id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    pub(crate) fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

const NO_SESSION: &str = "no active session; call session_start first";

/// One UI session over a process-local directory.
pub struct Session {
    service: UserService<InMemoryUserRepository>,
    current: Option<UserId>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            service: UserService::new(InMemoryUserRepository::new()),
            current: None,
        }
    }

    /// Registers a user without selecting it (e.g. a friend account).
    pub fn register(&self, username: &str, password: &str) -> ActionResponse {
        match self.service.register_user(username, password, None) {
            Ok(id) => ActionResponse::success("User registered.", Some(id.to_string())),
            Err(err) => ActionResponse::failure(format!("user_register failed: {err}")),
        }
    }

    /// Registers a user and makes it the current session user.
    pub fn start(&mut self, username: &str, password: &str) -> ActionResponse {
        match self.service.register_user(username, password, None) {
            Ok(id) => {
                self.current = Some(id);
                ActionResponse::success("Session started.", Some(id.to_string()))
            }
            Err(err) => ActionResponse::failure(format!("session_start failed: {err}")),
        }
    }

    pub fn goal_list(&self) -> GoalListResponse {
        let user = match self.current_user() {
            Ok(user) => user,
            Err(message) => {
                return GoalListResponse {
                    ok: false,
                    items: Vec::new(),
                    message: format!("goal_list failed: {message}"),
                }
            }
        };

        let items = user
            .goals()
            .iter()
            .enumerate()
            .map(|(index, entry)| GoalRow {
                index: saturating_u32(index),
                goal_id: entry.uuid.to_string(),
                name: entry.goal.name.clone(),
                completion_count: saturating_u32(entry.goal.completion_count()),
            })
            .collect::<Vec<_>>();
        let message = if items.is_empty() {
            "No goals yet.".to_string()
        } else {
            format!("{} goal(s).", items.len())
        };
        GoalListResponse {
            ok: true,
            items,
            message,
        }
    }

    pub fn goal_history(&self, index: u32) -> GoalHistoryResponse {
        match self.with_user(|service, id| service.completion_history(id, index as usize)) {
            Ok(dates) => GoalHistoryResponse {
                ok: true,
                message: format!("{} completion(s).", dates.len()),
                dates: dates
                    .iter()
                    .map(|date| date.to_rfc3339_opts(SecondsFormat::Millis, true))
                    .collect(),
            },
            Err(message) => GoalHistoryResponse {
                ok: false,
                dates: Vec::new(),
                message: format!("goal_history failed: {message}"),
            },
        }
    }

    pub fn goal_progress(&self, index: u32) -> GoalProgressResponse {
        match self.with_user(|service, id| service.completion_percentage(id, index as usize)) {
            Ok(percentage) => GoalProgressResponse {
                ok: true,
                percentage: Some(percentage),
                message: format!("{percentage:.1}%"),
            },
            Err(message) => GoalProgressResponse {
                ok: false,
                percentage: None,
                message: format!("goal_progress failed: {message}"),
            },
        }
    }

    pub fn goal_add(&self, name: &str) -> ActionResponse {
        match self.with_user(|service, id| service.create_goal(id, name)) {
            Ok(goal_id) => ActionResponse::success("Goal added.", Some(goal_id.to_string())),
            Err(message) => ActionResponse::failure(format!("goal_add failed: {message}")),
        }
    }

    pub fn goal_check_off(&self, index: u32) -> ActionResponse {
        match self.with_user(|service, id| service.check_off_goal(id, index as usize)) {
            Ok(()) => ActionResponse::success("Goal checked off.", None),
            Err(message) => ActionResponse::failure(format!("goal_check_off failed: {message}")),
        }
    }

    pub fn goal_remove(&self, index: u32) -> ActionResponse {
        match self.with_user(|service, id| service.remove_goal(id, index as usize)) {
            Ok(goal) => ActionResponse::success(format!("Removed goal `{}`.", goal.name), None),
            Err(message) => ActionResponse::failure(format!("goal_remove failed: {message}")),
        }
    }

    pub fn friend_add(&self, friend_id: &str) -> ActionResponse {
        let friend_id = match UserId::parse_str(friend_id.trim()) {
            Ok(id) => id,
            Err(_) => {
                return ActionResponse::failure(format!(
                    "friend_add failed: invalid user id `{}`",
                    friend_id.trim()
                ))
            }
        };
        match self.with_user(|service, id| service.add_friend(id, friend_id)) {
            Ok(()) => ActionResponse::success("Friend added.", Some(friend_id.to_string())),
            Err(message) => ActionResponse::failure(format!("friend_add failed: {message}")),
        }
    }

    pub fn friend_remove(&self, index: u32) -> ActionResponse {
        match self.with_user(|service, id| service.remove_friend(id, index as usize)) {
            Ok(friend_id) => {
                ActionResponse::success("Friend removed.", Some(friend_id.to_string()))
            }
            Err(message) => ActionResponse::failure(format!("friend_remove failed: {message}")),
        }
    }

    pub fn friend_list(&self) -> FriendListResponse {
        match self.with_user(|service, id| service.friends(id)) {
            Ok(friends) => FriendListResponse {
                ok: true,
                message: format!("{} friend(s).", friends.len()),
                items: friends
                    .iter()
                    .enumerate()
                    .map(|(index, friend)| FriendRow {
                        index: saturating_u32(index),
                        user_id: friend.uuid.to_string(),
                        username: friend.username.clone(),
                        goal_count: saturating_u32(friend.goals().len()),
                    })
                    .collect(),
            },
            Err(message) => FriendListResponse {
                ok: false,
                items: Vec::new(),
                message: format!("friend_list failed: {message}"),
            },
        }
    }

    /// Serializes the current user record as JSON into `message`.
    pub fn export_json(&self) -> ActionResponse {
        let record = match self.with_user(|service, id| service.export_user(id)) {
            Ok(record) => record,
            Err(message) => return ActionResponse::failure(format!("export failed: {message}")),
        };
        match serde_json::to_string(&record) {
            Ok(json) => ActionResponse::success(json, Some(record.uuid.to_string())),
            Err(err) => ActionResponse::failure(format!("export failed: {err}")),
        }
    }

    fn current_user(&self) -> Result<goaltrack_core::User, String> {
        self.with_user(|service, id| service.get_user(id))
    }

    fn with_user<T>(
        &self,
        f: impl FnOnce(&UserService<InMemoryUserRepository>, UserId) -> ServiceResult<T>,
    ) -> Result<T, String> {
        let id = self.current.ok_or_else(|| NO_SESSION.to_string())?;
        f(&self.service, id).map_err(|err: UserServiceError| err.to_string())
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::Session;

    fn started() -> Session {
        let mut session = Session::new();
        let response = session.start("ana", "pw");
        assert!(response.ok, "{}", response.message);
        session
    }

    #[test]
    fn calls_without_session_fail_softly() {
        let session = Session::new();

        let list = session.goal_list();
        assert!(!list.ok);
        assert!(list.message.contains("no active session"));
        assert!(!session.goal_add("Run").ok);
    }

    #[test]
    fn goal_rows_follow_list_order() {
        let session = started();
        assert!(session.goal_add("Run").ok);
        assert!(session.goal_add("Read").ok);
        assert!(session.goal_check_off(1).ok);

        let list = session.goal_list();
        assert!(list.ok);
        let names: Vec<&str> = list.items.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Run", "Read"]);
        assert_eq!(list.items[0].completion_count, 0);
        assert_eq!(list.items[1].completion_count, 1);
        assert_eq!(list.items[1].index, 1);
    }

    #[test]
    fn history_returns_rfc3339_dates() {
        let session = started();
        session.goal_add("Run");
        session.goal_check_off(0);

        let history = session.goal_history(0);
        assert!(history.ok, "{}", history.message);
        assert_eq!(history.dates.len(), 1);
        assert!(history.dates[0].ends_with('Z'));
    }

    #[test]
    fn progress_without_history_reports_error() {
        let session = started();
        session.goal_add("Run");

        let progress = session.goal_progress(0);
        assert!(!progress.ok);
        assert_eq!(progress.percentage, None);
        assert!(progress.message.contains("no recorded completions"));
    }

    #[test]
    fn out_of_range_actions_fail_with_message() {
        let session = started();

        let response = session.goal_check_off(0);
        assert!(!response.ok);
        assert!(response.message.contains("out of range"));
        assert!(!session.goal_remove(4).ok);
        assert!(!session.friend_remove(0).ok);
    }

    #[test]
    fn blank_goal_name_is_rejected() {
        let session = started();

        let response = session.goal_add("   ");
        assert!(!response.ok);
        assert!(response.message.contains("blank"));
    }

    #[test]
    fn friend_add_list_and_remove() {
        let session = started();
        let ben = session.register("ben", "pw");
        let ben_id = ben.id.clone().unwrap();

        assert!(!session.friend_add("not-a-uuid").ok);
        assert!(session.friend_add(&ben_id).ok);

        let friends = session.friend_list();
        assert!(friends.ok);
        assert_eq!(friends.items.len(), 1);
        assert_eq!(friends.items[0].username, "ben");

        let removed = session.friend_remove(0);
        assert!(removed.ok);
        assert_eq!(removed.id.as_deref(), Some(ben_id.as_str()));
        assert!(session.friend_list().items.is_empty());
    }

    #[test]
    fn export_json_omits_password() {
        let session = started();
        session.goal_add("Run");

        let exported = session.export_json();
        assert!(exported.ok, "{}", exported.message);
        let json: serde_json::Value = serde_json::from_str(&exported.message).unwrap();
        assert_eq!(json["username"], "ana");
        assert_eq!(json["goals"][0]["name"], "Run");
        assert!(json.get("password").is_none());
    }
}
