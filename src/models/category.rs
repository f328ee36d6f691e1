//! Intake categories offered on the selection card.

use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Prefix shared by every modal callback id this bot opens.
pub const CALLBACK_PREFIX: &str = "helpdesk_submit_";

/// Category chosen by the requester on the selection card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntakeCategory {
    /// Something is broken.
    Bug,
    /// Something new is wanted.
    Feature,
}

impl IntakeCategory {
    /// All categories in card order.
    pub const ALL: [Self; 2] = [Self::Bug, Self::Feature];

    /// Button action identifier.
    #[must_use]
    pub fn action_id(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
        }
    }

    /// Resolve a button action identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnknownAction` for any identifier other than
    /// `bug` or `feature`.
    pub fn from_action_id(action_id: &str) -> Result<Self> {
        match action_id {
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            other => Err(AppError::UnknownAction(other.to_owned())),
        }
    }

    /// Modal callback id encoding this category.
    #[must_use]
    pub fn callback_id(self) -> String {
        format!("{CALLBACK_PREFIX}{}", self.action_id())
    }

    /// Recover the category from a modal callback id.
    ///
    /// The id must carry [`CALLBACK_PREFIX`]; after it, a suffix containing
    /// `bug` is a bug report and exactly `feature` is a feature request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnknownCallback` when the id was not produced by
    /// [`IntakeCategory::callback_id`].
    pub fn from_callback_id(callback_id: &str) -> Result<Self> {
        let suffix = callback_id
            .strip_prefix(CALLBACK_PREFIX)
            .ok_or_else(|| AppError::UnknownCallback(callback_id.to_owned()))?;

        if suffix.contains("bug") {
            Ok(Self::Bug)
        } else if suffix == "feature" {
            Ok(Self::Feature)
        } else {
            Err(AppError::UnknownCallback(callback_id.to_owned()))
        }
    }

    /// Localized category label shown in the confirmation.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Bug => "バグ報告",
            Self::Feature => "機能要望",
        }
    }

    /// Button label on the selection card.
    #[must_use]
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Bug => "\u{1f41b} バグ報告",
            Self::Feature => "\u{2728} 機能要望",
        }
    }

    /// Title of the intake form.
    #[must_use]
    pub fn form_title(self) -> &'static str {
        match self {
            Self::Bug => "バグ報告フォーム",
            Self::Feature => "機能要望フォーム",
        }
    }
}
