mod problem;
mod solution;
mod util;

pub use problem::*;
pub use solution::*;
pub use util::*;

use std::time::Duration;

/// Limits on how much work a scheduler may spend on one instance.
/// The default budget is unlimited: run until the result is provably optimal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Budget {
    pub time_limit: Option<Duration>,
    pub branch_limit: Option<u64>,
}

impl Budget {
    /// Creates a budget without limits.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            time_limit: None,
            branch_limit: None,
        }
    }

    /// Creates a budget bounded by wall clock time.
    #[must_use]
    pub const fn with_time_limit(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
            branch_limit: None,
        }
    }

    /// Creates a budget bounded by the number of explored ordering decisions.
    #[must_use]
    pub const fn with_branch_limit(limit: u64) -> Self {
        Self {
            time_limit: None,
            branch_limit: Some(limit),
        }
    }
}

/// Schedules the tasks of an instance.
pub trait Scheduler {
    /// Schedules every task of the given instance within the budget.
    fn schedule<'a>(&mut self, instance: &'a Instance, budget: &Budget) -> Outcome<'a>;

    /// Returns the name of the scheduler.
    fn name(&self) -> &'static str;
}
