use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeSeverity::Success => write!(f, "success"),
            NoticeSeverity::Info => write!(f, "info"),
            NoticeSeverity::Warning => write!(f, "warning"),
            NoticeSeverity::Error => write!(f, "error"),
        }
    }
}

/// Transient message surfaced to the user (a toast).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: NoticeSeverity,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: NoticeSeverity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("Success", message, NoticeSeverity::Success)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NoticeSeverity::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message, NoticeSeverity::Error)
    }

    pub fn is_error(&self) -> bool {
        self.severity == NoticeSeverity::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.title, self.message)
    }
}
