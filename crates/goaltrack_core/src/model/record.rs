//! Serializable user snapshot.
//!
//! Shape: `{uuid, username, profile_picture, goals: [{uuid, name,
//! completion_dates}], friend_ids}`. Passwords never appear here.

use crate::model::goal::{Goal, GoalId};
use crate::model::user::{ProfilePicture, UserId};
use serde::{Deserialize, Serialize};

/// One goal entry inside a `UserRecord`.
///
/// Goal fields are flattened, so the wire shape is
/// `{uuid, name, completion_dates}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub uuid: GoalId,
    #[serde(flatten)]
    pub goal: Goal,
}

/// Export record for one user. Friends are referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub uuid: UserId,
    pub username: String,
    pub profile_picture: Option<ProfilePicture>,
    pub goals: Vec<GoalRecord>,
    pub friend_ids: Vec<UserId>,
}
