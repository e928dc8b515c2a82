use serde::{Deserialize, Serialize};

/// Result of a modal dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogOutcome<T> {
    Confirmed(T),
    Cancelled,
}

impl<T> DialogOutcome<T> {
    pub fn confirmed(self) -> Option<T> {
        match self {
            DialogOutcome::Confirmed(value) => Some(value),
            DialogOutcome::Cancelled => None,
        }
    }
}
