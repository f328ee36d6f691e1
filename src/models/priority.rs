//! Ticket priority.

use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Priority selected on the intake form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal handling.
    Medium,
    /// Needs attention soon.
    High,
}

impl Priority {
    /// Options in the order they appear in the selector.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Stable machine value submitted by the form.
    #[must_use]
    pub fn value(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Human label shown in the selector.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "低",
            Self::Medium => "中",
            Self::High => "高",
        }
    }

    /// Parse a submitted machine value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidSubmission` for values outside the fixed set.
    pub fn from_value(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.value() == value)
            .ok_or_else(|| AppError::InvalidSubmission(format!("unknown priority: {value}")))
    }
}
