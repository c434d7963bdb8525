use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single step of a job: the machine it occupies and for how long.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Serialize, PartialEq)]
pub struct Task {
    pub machine: usize,
    pub duration: u64,
}

impl Task {
    /// Creates a new task.
    #[must_use]
    pub const fn new(machine: usize, duration: u64) -> Self {
        Self { machine, duration }
    }
}

/// An ordered sequence of tasks; list order is the mandatory precedence chain.
pub type Job = Vec<Task>;

/// A malformed problem instance, rejected before any solving starts.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum InstanceError {
    #[error("instance contains no jobs")]
    NoJobs,
    #[error("job {job} contains no tasks")]
    EmptyJob { job: usize },
    #[error("job {job} task {task} has zero duration")]
    ZeroDuration { job: usize, task: usize },
    #[error("job {job} task {task} runs on machine {machine}, but only {machines} machines exist")]
    UnknownMachine {
        job: usize,
        task: usize,
        machine: usize,
        machines: usize,
    },
}

/// An instance of the job shop scheduling problem.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Eq, Serialize, PartialEq)]
#[serde(try_from = "RawInstance", into = "RawInstance")]
pub struct Instance {
    pub machines: usize,
    pub jobs: Vec<Job>,
}

impl Instance {
    /// Creates a new instance with the given machine count.
    ///
    /// # Errors
    /// - If there are no jobs or a job has no tasks.
    /// - If a task has zero duration or runs on an unknown machine.
    pub fn new(machines: usize, jobs: Vec<Job>) -> Result<Self, InstanceError> {
        if jobs.is_empty() {
            return Err(InstanceError::NoJobs);
        }

        for (job, tasks) in jobs.iter().enumerate() {
            if tasks.is_empty() {
                return Err(InstanceError::EmptyJob { job });
            }

            for (task, &Task { machine, duration }) in tasks.iter().enumerate() {
                if duration == 0 {
                    return Err(InstanceError::ZeroDuration { job, task });
                }

                if machine >= machines {
                    return Err(InstanceError::UnknownMachine {
                        job,
                        task,
                        machine,
                        machines,
                    });
                }
            }
        }

        Ok(Self { machines, jobs })
    }

    /// Creates a new instance, inferring the machine count from the tasks.
    ///
    /// # Errors
    /// - If there are no jobs, a job has no tasks, or a task has zero duration.
    pub fn from_jobs(jobs: Vec<Job>) -> Result<Self, InstanceError> {
        let machines = jobs
            .iter()
            .flatten()
            .map(|task| task.machine + 1)
            .max()
            .unwrap_or_default();

        Self::new(machines, jobs)
    }

    /// Sum of every task duration: the length of a fully serialized schedule.
    #[must_use]
    pub fn horizon(&self) -> u64 {
        self.jobs.iter().flatten().map(|task| task.duration).sum()
    }

    /// Total number of tasks across all jobs.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.jobs.iter().map(Vec::len).sum()
    }
}

/// Wire shape of an instance, validated into [`Instance`] on deserialization.
#[derive(Deserialize, Serialize)]
struct RawInstance {
    machines: usize,
    jobs: Vec<Job>,
}

impl TryFrom<RawInstance> for Instance {
    type Error = InstanceError;

    fn try_from(raw: RawInstance) -> Result<Self, Self::Error> {
        Self::new(raw.machines, raw.jobs)
    }
}

impl From<Instance> for RawInstance {
    fn from(instance: Instance) -> Self {
        Self {
            machines: instance.machines,
            jobs: instance.jobs,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn instance_should_serialize() -> anyhow::Result<()> {
        let instance = Instance::new(
            2,
            vec![
                vec![Task::new(0, 3), Task::new(1, 2)],
                vec![Task::new(1, 4)],
            ],
        )?;

        let serialized = crate::data::to_string(&instance)?;
        let mut reader = std::io::Cursor::new(serialized);
        let deserialized: Instance = crate::data::deserialize(&mut reader)?;

        assert_eq!(instance, deserialized);

        Ok(())
    }

    #[test]
    fn rejects_malformed_instances() {
        assert_eq!(Instance::new(1, vec![]), Err(InstanceError::NoJobs));
        assert_eq!(
            Instance::new(1, vec![vec![Task::new(0, 1)], vec![]]),
            Err(InstanceError::EmptyJob { job: 1 })
        );
        assert_eq!(
            Instance::new(1, vec![vec![Task::new(0, 1), Task::new(0, 0)]]),
            Err(InstanceError::ZeroDuration { job: 0, task: 1 })
        );
        assert_eq!(
            Instance::new(2, vec![vec![Task::new(2, 1)]]),
            Err(InstanceError::UnknownMachine {
                job: 0,
                task: 0,
                machine: 2,
                machines: 2,
            })
        );
    }

    #[test]
    fn infers_machine_count() -> anyhow::Result<()> {
        let instance = Instance::from_jobs(vec![
            vec![Task::new(0, 1), Task::new(3, 2)],
            vec![Task::new(1, 1)],
        ])?;

        assert_eq!(instance.machines, 4);
        assert_eq!(instance.horizon(), 4);
        assert_eq!(instance.task_count(), 3);

        Ok(())
    }
}
