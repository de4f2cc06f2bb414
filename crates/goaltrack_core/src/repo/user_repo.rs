//! User directory contracts and in-memory implementation.
//!
//! # Responsibility
//! - Resolve `UserId` values to independently-owned users.
//! - Keep the storage shape hidden from service orchestration.
//!
//! # Invariants
//! - One user per `UserId`; inserting an existing id is rejected.
//! - Reads return snapshots; callers write changes back with `update_user`.
//! - Data lives only for the lifetime of the repository value.

use crate::model::user::{User, UserId};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user directory operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    NotFound(UserId),
    DuplicateId(UserId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "user not found: {id}"),
            Self::DuplicateId(id) => write!(f, "user id already registered: {id}"),
        }
    }
}

impl Error for RepoError {}

/// Repository interface for the user directory.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn update_user(&self, user: &User) -> RepoResult<()>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
}

/// Process-memory user directory, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RefCell<BTreeMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.borrow().is_empty()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        let mut users = self.users.borrow_mut();
        if users.contains_key(&user.uuid) {
            return Err(RepoError::DuplicateId(user.uuid));
        }
        users.insert(user.uuid, user.clone());
        Ok(user.uuid)
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.borrow_mut();
        match users.get_mut(&user.uuid) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(RepoError::NotFound(user.uuid)),
        }
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.users.borrow().get(&id).cloned())
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.users.borrow().values().cloned().collect())
    }
}
