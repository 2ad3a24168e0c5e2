use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The host occasion that produced an activity notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Focus,
    Save,
    Change,
}

impl ActivityKind {
    /// Only an explicit save counts as a write.
    pub fn is_write(self) -> bool {
        matches!(self, ActivityKind::Save)
    }
}

/// Represents one observed editor action, stamped with its capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    /// Identifier of the edited entity. For example src/main.rs or
    /// /home/etc/notes.md. Never empty, enforced at the source boundary.
    pub path: Arc<str>,
    /// Identifier of the enclosing workspace, if any.
    pub project: Option<Arc<str>>,
    /// Detected language of the file. For example 'rust' or 'markdown'.
    pub language: Option<Arc<str>>,
    pub kind: ActivityKind,
    /// Current line count of the document.
    pub lines: u32,
    pub timestamp: DateTime<Utc>,
}
