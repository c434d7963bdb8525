use super::Instance;
use std::time::Duration;
use thiserror::Error;

/// Start and end of one task on its machine.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AssignedTask {
    pub job: usize,
    pub task: usize,
    pub start: u64,
    pub end: u64,
}

impl AssignedTask {
    /// Processing time of the task.
    #[must_use]
    pub const fn duration(&self) -> u64 {
        self.end - self.start
    }
}

/// A constraint violated by a finished schedule.
/// Schedules are produced by this crate's schedulers, so any violation is a bug.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum SolutionError {
    #[error("schedule does not assign a start to every task of the instance")]
    Shape,
    #[error("job {job}: task {task} starts at {start} before task {previous} ends at {end}")]
    Precedence {
        job: usize,
        task: usize,
        start: u64,
        previous: usize,
        end: u64,
    },
    #[error(
        "machine {machine}: job {first_job} task {first_task} overlaps \
         job {second_job} task {second_task} at {at}"
    )]
    Overlap {
        machine: usize,
        first_job: usize,
        first_task: usize,
        second_job: usize,
        second_task: usize,
        at: u64,
    },
}

/// A complete assignment of start times for every task of an instance.
#[derive(Clone, Debug)]
pub struct Schedule<'a> {
    instance: &'a Instance,
    starts: Vec<Vec<u64>>,
}

impl<'a> Schedule<'a> {
    /// Creates a schedule from per job start times.
    #[must_use]
    pub const fn new(instance: &'a Instance, starts: Vec<Vec<u64>>) -> Self {
        Self { instance, starts }
    }

    /// The instance this schedule belongs to.
    #[must_use]
    pub const fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Start time of the given task.
    #[must_use]
    pub fn start(&self, job: usize, task: usize) -> u64 {
        self.starts[job][task]
    }

    /// Completion time of the last finishing task.
    #[must_use]
    pub fn makespan(&self) -> u64 {
        self.starts
            .iter()
            .zip(&self.instance.jobs)
            .flat_map(|(starts, tasks)| {
                starts
                    .iter()
                    .zip(tasks)
                    .map(|(start, task)| start + task.duration)
            })
            .max()
            .unwrap_or_default()
    }

    /// Checks the precedence chain of every job and the no-overlap
    /// requirement of every machine.
    ///
    /// # Errors
    /// - If a start time is missing, a job runs out of order, or two tasks
    ///   occupy the same machine at the same time.
    pub fn verify(&self) -> Result<(), SolutionError> {
        if self.starts.len() != self.instance.jobs.len() {
            return Err(SolutionError::Shape);
        }

        for (job, (starts, tasks)) in self.starts.iter().zip(&self.instance.jobs).enumerate() {
            if starts.len() != tasks.len() {
                return Err(SolutionError::Shape);
            }

            for task in 1..tasks.len() {
                let end = starts[task - 1] + tasks[task - 1].duration;
                if starts[task] < end {
                    return Err(SolutionError::Precedence {
                        job,
                        task,
                        start: starts[task],
                        previous: task - 1,
                        end,
                    });
                }
            }
        }

        for (machine, tasks) in self.by_machine().iter().enumerate() {
            for pair in tasks.windows(2) {
                if pair[0].end > pair[1].start {
                    return Err(SolutionError::Overlap {
                        machine,
                        first_job: pair[0].job,
                        first_task: pair[0].task,
                        second_job: pair[1].job,
                        second_task: pair[1].task,
                        at: pair[1].start,
                    });
                }
            }
        }

        Ok(())
    }

    /// Tasks grouped by machine, ordered by start time, shorter duration
    /// first on ties, then by job and task index.
    #[must_use]
    pub fn by_machine(&self) -> Vec<Vec<AssignedTask>> {
        let mut machines = vec![Vec::new(); self.instance.machines];

        for (job, (starts, tasks)) in self.starts.iter().zip(&self.instance.jobs).enumerate() {
            for (task, (&start, step)) in starts.iter().zip(tasks).enumerate() {
                machines[step.machine].push(AssignedTask {
                    job,
                    task,
                    start,
                    end: start + step.duration,
                });
            }
        }

        for tasks in &mut machines {
            tasks.sort_unstable_by_key(|task| (task.start, task.duration(), task.job, task.task));
        }

        machines
    }
}

/// Whether a schedule is provably the best possible or merely the best found.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// The search space was exhausted; no schedule has a smaller makespan.
    Optimal,
    /// The budget ran out first; a better schedule may still exist.
    Feasible,
}

impl Status {
    /// Returns whether the schedule is provably optimal.
    #[must_use]
    pub const fn is_optimal(self) -> bool {
        matches!(self, Self::Optimal)
    }
}

/// Counters describing how much work the search performed.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    /// Ordering decisions explored.
    pub branches: u64,
    /// Nodes abandoned because bound propagation derived a contradiction.
    pub conflicts: u64,
    /// Nodes abandoned because their lower bound could not beat the incumbent.
    pub prunes: u64,
    /// Wall clock time spent solving.
    pub elapsed: Duration,
}

/// Result of running a scheduler on an instance.
#[derive(Clone, Debug)]
pub struct Outcome<'a> {
    pub schedule: Schedule<'a>,
    pub status: Status,
    pub stats: Stats,
}
