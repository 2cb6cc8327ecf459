//! A single wizard step.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named stage in the wizard: a URL-safe identifier and a human readable label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Step {
    pub id: String,
    pub label: String,
}

impl Step {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Case-insensitive identifier comparison.
    ///
    /// Two steps whose identifiers differ only in case cannot be told apart.
    pub fn matches(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }
}

impl<I: Into<String>, L: Into<String>> From<(I, L)> for Step {
    fn from((id, label): (I, L)) -> Self {
        Step::new(id, label)
    }
}
