use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the current request is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "reason")]
pub enum SessionState {
    #[default]
    Idle,
    Submitting,
    Loading,
    Cropped,
    Failed(String),
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Submitting => write!(f, "submitting"),
            SessionState::Loading => write!(f, "loading"),
            SessionState::Cropped => write!(f, "cropped"),
            SessionState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
