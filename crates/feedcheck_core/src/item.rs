use serde::{Deserialize, Serialize};

/// One feed entry as presented by a feed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Externally assigned identifier, assumed unique within a run.
    pub id: String,
    pub title: String,
    /// Relative age label such as `"3 hours"` or `"3 hours ago"`.
    pub age: String,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            age: age.into(),
        }
    }
}
