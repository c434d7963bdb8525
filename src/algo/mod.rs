mod bnb;
mod list;

pub use bnb::BranchAndBound;
pub use list::List;

/// Registry of every scheduler the binary can run.
#[allow(unsafe_code)]
#[linkme::distributed_slice]
pub static SCHEDULERS: [fn() -> Box<dyn crate::core::Scheduler>] = [..];
