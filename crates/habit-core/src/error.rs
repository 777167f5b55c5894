use thiserror::Error;

#[derive(Debug, Error)]
pub enum HabitError {
    #[error("not initialized: run 'habits init'")]
    NotInitialized,

    #[error("habit not found: {0}")]
    HabitNotFound(i64),

    #[error("workspace {0} does not exist or is not owned by the caller")]
    WorkspaceNotOwned(i64),

    #[error("strategy {0} does not exist, is not owned by the caller, or belongs to another workspace")]
    StrategyNotOwned(i64),

    #[error("title must not be empty")]
    InvalidTitle,

    #[error("invalid frequency '{0}': expected daily or weekly")]
    InvalidFrequency(String),

    #[error(transparent)]
    Db(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HabitError {
    /// True for lookups that missed, including rows owned by someone else.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HabitError::HabitNotFound(_))
    }

    /// True for rejected input the caller can correct.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            HabitError::WorkspaceNotOwned(_)
                | HabitError::StrategyNotOwned(_)
                | HabitError::InvalidTitle
                | HabitError::InvalidFrequency(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HabitError>;
