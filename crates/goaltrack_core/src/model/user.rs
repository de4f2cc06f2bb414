//! User domain model.
//!
//! # Responsibility
//! - Own the user's goals in an id-keyed, ordered arena.
//! - Keep friends as an identifier relation into the user directory.
//! - Provide index-addressed mutations used by list-based UIs.
//!
//! # Invariants
//! - Goal entries are owned exclusively by one user; ids are never shared.
//! - Failed operations leave the user unchanged.
//! - Friend links are one-directional; nothing adds the reverse link.

use crate::model::goal::{Goal, GoalId};
use crate::model::record::{GoalRecord, UserRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a user in the directory.
pub type UserId = Uuid;

/// Opaque reference to an avatar image (asset key, file URI, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfilePicture(String);

impl ProfilePicture {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Index-addressed collection owned by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Goals,
    Friends,
}

impl Collection {
    fn label(self) -> &'static str {
        match self {
            Self::Goals => "goals",
            Self::Friends => "friends",
        }
    }
}

/// Friend link rejected by the active `FriendPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReference {
    /// User tried to befriend themselves.
    SelfFriend(UserId),
    /// Friend id is already present in the list.
    DuplicateFriend(UserId),
}

/// Errors from user mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    IndexOutOfRange {
        collection: Collection,
        index: usize,
        len: usize,
    },
    InvalidReference(InvalidReference),
}

impl Display for UserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange {
                collection,
                index,
                len,
            } => write!(
                f,
                "index {index} out of range for {} (len {len})",
                collection.label()
            ),
            Self::InvalidReference(InvalidReference::SelfFriend(id)) => {
                write!(f, "user cannot befriend themselves: {id}")
            }
            Self::InvalidReference(InvalidReference::DuplicateFriend(id)) => {
                write!(f, "user is already a friend: {id}")
            }
        }
    }
}

impl Error for UserError {}

/// Rules applied by `User::add_friend`. The default rejects both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FriendPolicy {
    pub allow_self: bool,
    pub allow_duplicates: bool,
}

impl FriendPolicy {
    /// Accepts every link, including self and repeated friends.
    pub fn permissive() -> Self {
        Self {
            allow_self: true,
            allow_duplicates: true,
        }
    }
}

/// One goal slot in a user's arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalEntry {
    pub uuid: GoalId,
    pub goal: Goal,
}

/// Account holder with goals and a friends list.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub uuid: UserId,
    pub username: String,
    /// Stored as given. Never hashed or verified.
    pub password: String,
    pub profile_picture: Option<ProfilePicture>,
    goals: Vec<GoalEntry>,
    friend_ids: Vec<UserId>,
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("uuid", &self.uuid)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("profile_picture", &self.profile_picture)
            .field("goals", &self.goals)
            .field("friend_ids", &self.friend_ids)
            .finish()
    }
}

impl User {
    /// Creates a user with a generated stable ID and empty lists.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        profile_picture: Option<ProfilePicture>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), username, password, profile_picture)
    }

    /// Creates a user with a caller-provided stable ID.
    pub fn with_id(
        uuid: UserId,
        username: impl Into<String>,
        password: impl Into<String>,
        profile_picture: Option<ProfilePicture>,
    ) -> Self {
        Self {
            uuid,
            username: username.into(),
            password: password.into(),
            profile_picture,
            goals: Vec::new(),
            friend_ids: Vec::new(),
        }
    }

    pub fn set_profile_picture(&mut self, picture: Option<ProfilePicture>) {
        self.profile_picture = picture;
    }

    /// Appends a goal and returns the id assigned to its new entry.
    ///
    /// Identical goal values still produce distinct entries.
    pub fn add_goal(&mut self, goal: Goal) -> GoalId {
        let uuid = Uuid::new_v4();
        self.goals.push(GoalEntry { uuid, goal });
        uuid
    }

    /// Records a check-off at the current wall clock.
    pub fn check_off_goal(&mut self, index: usize) -> Result<(), UserError> {
        self.check_off_goal_at(index, Utc::now())
    }

    /// Records a check-off at `now` for the goal at `index`.
    pub fn check_off_goal_at(&mut self, index: usize, now: DateTime<Utc>) -> Result<(), UserError> {
        let len = self.goals.len();
        let entry = self
            .goals
            .get_mut(index)
            .ok_or(UserError::IndexOutOfRange {
                collection: Collection::Goals,
                index,
                len,
            })?;
        entry.goal.record_completion(now);
        Ok(())
    }

    /// Removes the goal at `index`; later entries shift down by one.
    pub fn remove_goal(&mut self, index: usize) -> Result<GoalEntry, UserError> {
        self.ensure_index(Collection::Goals, index)?;
        Ok(self.goals.remove(index))
    }

    /// Appends a friend link, subject to `policy`.
    pub fn add_friend(&mut self, friend_id: UserId, policy: FriendPolicy) -> Result<(), UserError> {
        if !policy.allow_self && friend_id == self.uuid {
            return Err(UserError::InvalidReference(InvalidReference::SelfFriend(
                friend_id,
            )));
        }
        if !policy.allow_duplicates && self.friend_ids.contains(&friend_id) {
            return Err(UserError::InvalidReference(
                InvalidReference::DuplicateFriend(friend_id),
            ));
        }
        self.friend_ids.push(friend_id);
        Ok(())
    }

    /// Removes the friend link at `index` and returns the unlinked id.
    pub fn remove_friend(&mut self, index: usize) -> Result<UserId, UserError> {
        self.ensure_index(Collection::Friends, index)?;
        Ok(self.friend_ids.remove(index))
    }

    pub fn goals(&self) -> &[GoalEntry] {
        &self.goals
    }

    pub fn goal(&self, index: usize) -> Result<&GoalEntry, UserError> {
        self.ensure_index(Collection::Goals, index)?;
        Ok(&self.goals[index])
    }

    pub fn goal_by_id(&self, id: GoalId) -> Option<&GoalEntry> {
        self.goals.iter().find(|entry| entry.uuid == id)
    }

    /// Goal names in list order, as rendered by the goal list.
    pub fn goal_names(&self) -> Vec<&str> {
        self.goals
            .iter()
            .map(|entry| entry.goal.name.as_str())
            .collect()
    }

    pub fn completion_history(&self, index: usize) -> Result<&[DateTime<Utc>], UserError> {
        self.goal(index)
            .map(|entry| entry.goal.completion_dates.as_slice())
    }

    pub fn friend_ids(&self) -> &[UserId] {
        &self.friend_ids
    }

    /// Builds the serializable record. Credentials are left out.
    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            uuid: self.uuid,
            username: self.username.clone(),
            profile_picture: self.profile_picture.clone(),
            goals: self
                .goals
                .iter()
                .map(|entry| GoalRecord {
                    uuid: entry.uuid,
                    goal: entry.goal.clone(),
                })
                .collect(),
            friend_ids: self.friend_ids.clone(),
        }
    }

    fn ensure_index(&self, collection: Collection, index: usize) -> Result<(), UserError> {
        let len = match collection {
            Collection::Goals => self.goals.len(),
            Collection::Friends => self.friend_ids.len(),
        };
        if index >= len {
            return Err(UserError::IndexOutOfRange {
                collection,
                index,
                len,
            });
        }
        Ok(())
    }
}
