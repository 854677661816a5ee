use serde::{Deserialize, Serialize};

use crate::UserId;

/// A titled collection of images owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gallery {
    pub id: i64,
    pub user_id: UserId,
    pub title: String,
}
