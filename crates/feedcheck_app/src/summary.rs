use std::fmt;

use feedcheck_logging::{check_info, check_warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStatus {
    Passed,
    Failed(String),
    Skipped,
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStatus::Passed => write!(f, "passed"),
            FlowStatus::Failed(reason) => write!(f, "failed: {reason}"),
            FlowStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Per-flow results of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub feed_sort: FlowStatus,
    pub login: FlowStatus,
}

impl RunSummary {
    /// True when no flow failed; skipped flows do not count against the run.
    pub fn all_passed(&self) -> bool {
        ![&self.feed_sort, &self.login]
            .into_iter()
            .any(|status| matches!(status, FlowStatus::Failed(_)))
    }

    pub fn log(&self) {
        check_info!("Feed sort check: {}", self.feed_sort);
        check_info!("Login check: {}", self.login);
        if self.all_passed() {
            check_info!("All checks have passed");
        } else {
            check_warn!("Some checks failed");
        }
    }
}
