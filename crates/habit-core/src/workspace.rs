use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level container a habit must belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A strategy inside a workspace; habits may optionally link to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: i64,
    pub owner_id: String,
    pub workspace_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}
