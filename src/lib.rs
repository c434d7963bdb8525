#![deny(clippy::all, clippy::cargo, clippy::expect_used, clippy::unwrap_used)]
#![deny(clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(clippy::unimplemented, clippy::redundant_type_annotations)]

use anyhow::Result;
use std::io::BufRead;
use std::time::Duration;

pub mod algo;
pub mod core;
pub mod data;

/// Runs the given scheduler on the instance read from reader and writes the
/// schedule, its length, and the search statistics to stdout.
///
/// # Errors
/// - If the instance could not be read from the reader.
///
/// # Panics
/// - If the scheduler produces an invalid schedule.
pub fn run_reader(
    scheduler: &mut dyn core::Scheduler,
    budget: &core::Budget,
    reader: &mut impl BufRead,
) -> Result<()> {
    let instance: core::Instance = data::deserialize(reader)?;
    let outcome = scheduler.schedule(&instance, budget);

    if let Err(error) = outcome.schedule.verify() {
        unreachable!(
            "{} produced an invalid schedule: {error}",
            scheduler.name()
        );
    }

    println!("Solution:");
    print!("{}", data::render(&outcome.schedule));
    match outcome.status {
        core::Status::Optimal => {
            println!("Optimal schedule length: {}", outcome.schedule.makespan());
        }
        core::Status::Feasible => {
            println!("Best schedule length: {}", outcome.schedule.makespan());
        }
    }
    println!("Statistics");
    println!("  conflicts: {}", outcome.stats.conflicts);
    println!("  branches : {}", outcome.stats.branches);
    println!("  prunes   : {}", outcome.stats.prunes);
    println!("  wall time: {:.6} s", outcome.stats.elapsed.as_secs_f64());

    Ok(())
}

/// Solves the instance with the branch and bound scheduler, returning the
/// best schedule found within the optional time limit. Without a limit the
/// result is provably optimal.
///
/// # Panics
/// - If the scheduler produces an invalid schedule.
#[must_use]
pub fn solve<'a>(instance: &'a core::Instance, time_limit: Option<Duration>) -> core::Outcome<'a> {
    let budget = core::Budget {
        time_limit,
        branch_limit: None,
    };

    let outcome = core::Scheduler::schedule(&mut algo::BranchAndBound, instance, &budget);
    if let Err(error) = outcome.schedule.verify() {
        unreachable!("BranchAndBound produced an invalid schedule: {error}");
    }

    outcome
}

#[cfg(not(target_pointer_width = "64"))]
compile_error!("Must be 64-bit system!");

/// Casts the given value to `usize`.
/// It should never fail on 64-bit systems.
///
/// # Panics
/// - If the value cannot be cast to `usize`.
#[must_use]
pub fn cast_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or_else(|_| unreachable!("Must be 64-bit system!"))
}

/// Casts the given value to `u64`.
/// It should never fail on 64-bit systems.
///
/// # Panics
/// - If the value cannot be cast to `u64`.
#[must_use]
pub fn cast_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or_else(|_| unreachable!("Must be 64-bit system!"))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::{Instance, Status, Task};

    fn crossing_jobs() -> Result<Instance> {
        Ok(Instance::new(
            2,
            vec![
                vec![Task::new(0, 2), Task::new(1, 2)],
                vec![Task::new(1, 3), Task::new(0, 3)],
            ],
        )?)
    }

    #[test]
    fn solve_proves_optimality_without_a_limit() -> Result<()> {
        let instance = crossing_jobs()?;
        let outcome = solve(&instance, None);

        assert!(outcome.status.is_optimal());
        assert_eq!(outcome.schedule.makespan(), 6);

        Ok(())
    }

    #[test]
    fn solve_reports_feasible_on_a_spent_limit() -> Result<()> {
        let instance = crossing_jobs()?;
        let outcome = solve(&instance, Some(Duration::ZERO));

        assert_eq!(outcome.status, Status::Feasible);
        assert!(outcome.schedule.makespan() <= instance.horizon());

        Ok(())
    }
}
