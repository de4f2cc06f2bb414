//! Flutter-facing bindings for GoalTrack core.

pub mod api;
mod session;

pub use session::{
    ActionResponse, FriendListResponse, FriendRow, GoalHistoryResponse, GoalListResponse,
    GoalProgressResponse, GoalRow, Session,
};
