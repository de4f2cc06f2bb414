//! User use-case service.
//!
//! # Responsibility
//! - Map UI-level actions (add, check off, remove, befriend) onto the model.
//! - Resolve friend ids through the user directory at read time.
//! - Emit metadata-only log events for every mutation.
//!
//! # Invariants
//! - Each call is one load -> mutate -> store cycle; a failed mutation is
//!   never written back.
//! - Friend targets must exist in the directory before they are linked.
//! - Usernames and passwords never appear in log output.

use crate::model::goal::{CompletionError, Goal, GoalId};
use crate::model::record::UserRecord;
use crate::model::user::{
    Collection, FriendPolicy, InvalidReference, ProfilePicture, User, UserError, UserId,
};
use crate::repo::user_repo::{RepoError, UserRepository};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, UserServiceError>;

/// Errors from user service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserServiceError {
    /// Goal or friend index outside `[0, len)`.
    IndexOutOfRange {
        collection: Collection,
        index: usize,
        len: usize,
    },
    /// Percentage requested before any completion was recorded.
    EmptyHistory,
    /// Percentage requested at or before the first completion.
    NonPositiveSpan {
        first: DateTime<Utc>,
        now: DateTime<Utc>,
    },
    /// Friend link rejected by the active policy.
    InvalidReference(InvalidReference),
    /// Goal name is blank after trim.
    InvalidGoalName,
    /// User id is not present in the directory.
    UserNotFound(UserId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange {
                collection,
                index,
                len,
            } => write!(
                f,
                "{}",
                UserError::IndexOutOfRange {
                    collection: *collection,
                    index: *index,
                    len: *len,
                }
            ),
            Self::EmptyHistory => write!(f, "{}", CompletionError::EmptyHistory),
            Self::NonPositiveSpan { first, now } => write!(
                f,
                "{}",
                CompletionError::NonPositiveSpan {
                    first: *first,
                    now: *now,
                }
            ),
            Self::InvalidReference(reference) => {
                write!(f, "{}", UserError::InvalidReference(*reference))
            }
            Self::InvalidGoalName => write!(f, "goal name must not be blank"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserError> for UserServiceError {
    fn from(value: UserError) -> Self {
        match value {
            UserError::IndexOutOfRange {
                collection,
                index,
                len,
            } => Self::IndexOutOfRange {
                collection,
                index,
                len,
            },
            UserError::InvalidReference(reference) => Self::InvalidReference(reference),
        }
    }
}

impl From<CompletionError> for UserServiceError {
    fn from(value: CompletionError) -> Self {
        match value {
            CompletionError::EmptyHistory => Self::EmptyHistory,
            CompletionError::NonPositiveSpan { first, now } => {
                Self::NonPositiveSpan { first, now }
            }
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::UserNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Use-case facade over a user directory.
pub struct UserService<R: UserRepository> {
    repo: R,
    policy: FriendPolicy,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service with the default (strict) friend policy.
    pub fn new(repo: R) -> Self {
        Self::with_policy(repo, FriendPolicy::default())
    }

    pub fn with_policy(repo: R, policy: FriendPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Creates a user in the directory and returns its stable id.
    pub fn register_user(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        profile_picture: Option<ProfilePicture>,
    ) -> ServiceResult<UserId> {
        let user = User::new(username, password, profile_picture);
        let id = self.repo.create_user(&user)?;
        info!("event=user_register module=service status=ok user_id={id}");
        Ok(id)
    }

    pub fn get_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.load(user_id)
    }

    /// Returns the first user with an exact username match.
    ///
    /// Usernames are not unique; ties resolve in directory order.
    pub fn find_user_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        Ok(self
            .repo
            .list_users()?
            .into_iter()
            .find(|user| user.username == username))
    }

    pub fn set_profile_picture(
        &self,
        user_id: UserId,
        picture: Option<ProfilePicture>,
    ) -> ServiceResult<()> {
        self.mutate(user_id, "profile_picture_set", |user| {
            user.set_profile_picture(picture);
            Ok(())
        })
    }

    /// Appends a goal value. Always succeeds for an existing user.
    pub fn add_goal(&self, user_id: UserId, goal: Goal) -> ServiceResult<GoalId> {
        self.mutate(user_id, "goal_add", |user| Ok(user.add_goal(goal)))
    }

    /// Creates an empty-history goal from form input.
    ///
    /// # Contract
    /// - Name is trimmed; blank names return `InvalidGoalName`.
    pub fn create_goal(&self, user_id: UserId, name: &str) -> ServiceResult<GoalId> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            warn!(
                "event=goal_add module=service status=error user_id={user_id} error_code=invalid_goal_name"
            );
            return Err(UserServiceError::InvalidGoalName);
        }
        self.add_goal(user_id, Goal::new(trimmed))
    }

    pub fn check_off_goal(&self, user_id: UserId, index: usize) -> ServiceResult<()> {
        self.check_off_goal_at(user_id, index, Utc::now())
    }

    pub fn check_off_goal_at(
        &self,
        user_id: UserId,
        index: usize,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        self.mutate(user_id, "goal_check_off", |user| {
            user.check_off_goal_at(index, now)
        })
    }

    /// Removes and returns the goal at `index`.
    pub fn remove_goal(&self, user_id: UserId, index: usize) -> ServiceResult<Goal> {
        self.mutate(user_id, "goal_remove", |user| {
            user.remove_goal(index).map(|entry| entry.goal)
        })
    }

    pub fn goal_names(&self, user_id: UserId) -> ServiceResult<Vec<String>> {
        let user = self.load(user_id)?;
        Ok(user.goal_names().into_iter().map(str::to_string).collect())
    }

    pub fn completion_history(
        &self,
        user_id: UserId,
        index: usize,
    ) -> ServiceResult<Vec<DateTime<Utc>>> {
        let user = self.load(user_id)?;
        let history = user.completion_history(index)?;
        Ok(history.to_vec())
    }

    pub fn completion_percentage(&self, user_id: UserId, index: usize) -> ServiceResult<f64> {
        self.completion_percentage_at(user_id, index, Utc::now())
    }

    pub fn completion_percentage_at(
        &self,
        user_id: UserId,
        index: usize,
        now: DateTime<Utc>,
    ) -> ServiceResult<f64> {
        let user = self.load(user_id)?;
        let entry = user.goal(index)?;
        Ok(entry.goal.completion_percentage_at(now)?)
    }

    /// Links `friend_id` into the user's friend list.
    ///
    /// # Contract
    /// - `friend_id` must exist in the directory.
    /// - Self and duplicate links follow the service's `FriendPolicy`.
    /// - No reverse link is created.
    pub fn add_friend(&self, user_id: UserId, friend_id: UserId) -> ServiceResult<()> {
        if friend_id != user_id && self.repo.get_user(friend_id)?.is_none() {
            warn!(
                "event=friend_add module=service status=error user_id={user_id} error_code=friend_not_found"
            );
            return Err(UserServiceError::UserNotFound(friend_id));
        }
        let policy = self.policy;
        self.mutate(user_id, "friend_add", |user| {
            user.add_friend(friend_id, policy)
        })
    }

    /// Unlinks and returns the friend id at `index`.
    pub fn remove_friend(&self, user_id: UserId, index: usize) -> ServiceResult<UserId> {
        self.mutate(user_id, "friend_remove", |user| user.remove_friend(index))
    }

    /// Resolves friend ids to the current state of each friend, in list order.
    ///
    /// A dangling id is reported as `UserNotFound` instead of being skipped.
    pub fn friends(&self, user_id: UserId) -> ServiceResult<Vec<User>> {
        let user = self.load(user_id)?;
        user.friend_ids()
            .iter()
            .map(|friend_id| self.load(*friend_id))
            .collect()
    }

    /// Serializable snapshot of one user, without credentials.
    pub fn export_user(&self, user_id: UserId) -> ServiceResult<UserRecord> {
        let record = self.load(user_id)?.to_record();
        info!(
            "event=user_export module=service status=ok user_id={user_id} goals={} friends={}",
            record.goals.len(),
            record.friend_ids.len()
        );
        Ok(record)
    }

    fn load(&self, user_id: UserId) -> ServiceResult<User> {
        self.repo
            .get_user(user_id)?
            .ok_or(UserServiceError::UserNotFound(user_id))
    }

    fn mutate<T>(
        &self,
        user_id: UserId,
        event: &'static str,
        apply: impl FnOnce(&mut User) -> Result<T, UserError>,
    ) -> ServiceResult<T> {
        let mut user = match self.load(user_id) {
            Ok(user) => user,
            Err(err) => {
                warn!(
                    "event={event} module=service status=error user_id={user_id} error_code=user_not_found"
                );
                return Err(err);
            }
        };

        match apply(&mut user) {
            Ok(value) => {
                self.repo.update_user(&user)?;
                info!(
                    "event={event} module=service status=ok user_id={user_id} goals={} friends={}",
                    user.goals().len(),
                    user.friend_ids().len()
                );
                Ok(value)
            }
            Err(err) => {
                warn!("event={event} module=service status=error user_id={user_id} error={err}");
                Err(err.into())
            }
        }
    }
}
