use crate::core::{Budget, Instance, Outcome, Schedule, Scheduler, Stats, Status};
use std::time::Instant;

/// Greedy list scheduling: repeatedly starts the ready task that can begin
/// the earliest, preferring shorter tasks and lower job ids on ties.
pub(super) fn schedule(instance: &Instance) -> Vec<Vec<u64>> {
    let mut starts: Vec<Vec<u64>> = instance.jobs.iter().map(|job| vec![0; job.len()]).collect();
    let mut next = vec![0; instance.jobs.len()];
    let mut job_free = vec![0; instance.jobs.len()];
    let mut machine_free = vec![0; instance.machines];

    for _ in 0..instance.task_count() {
        let mut choice: Option<(u64, u64, usize)> = None;

        for (job, tasks) in instance.jobs.iter().enumerate() {
            let Some(task) = tasks.get(next[job]) else {
                continue;
            };

            let start = job_free[job].max(machine_free[task.machine]);
            let key = (start, task.duration, job);
            if choice.map_or(true, |current| key < current) {
                choice = Some(key);
            }
        }

        let Some((start, _, job)) = choice else {
            unreachable!("An unfinished job must have a ready task");
        };

        let task = instance.jobs[job][next[job]];
        starts[job][next[job]] = start;
        next[job] += 1;
        job_free[job] = start + task.duration;
        machine_free[task.machine] = start + task.duration;
    }

    starts
}

/// Simple list scheduling algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct List;

impl Scheduler for List {
    fn schedule<'a>(&mut self, instance: &'a Instance, _: &Budget) -> Outcome<'a> {
        let started = Instant::now();
        let schedule = Schedule::new(instance, schedule(instance));

        Outcome {
            schedule,
            status: Status::Feasible,
            stats: Stats {
                elapsed: started.elapsed(),
                ..Stats::default()
            },
        }
    }

    fn name(&self) -> &'static str {
        "List"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::SCHEDULERS)]
static INSTANCE: fn() -> Box<dyn Scheduler> = || Box::new(List);

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::Task;
    use crate::data::samples;

    #[test]
    fn test_list() {
        assert!(samples(false, &mut List).is_ok());
    }

    #[test]
    fn schedules_every_task_in_order() -> anyhow::Result<()> {
        let instance = Instance::new(
            3,
            vec![
                vec![Task::new(0, 3), Task::new(1, 2), Task::new(2, 2)],
                vec![Task::new(0, 2), Task::new(2, 1), Task::new(1, 4)],
                vec![Task::new(1, 4), Task::new(2, 3)],
            ],
        )?;

        let outcome = List.schedule(&instance, &Budget::default());
        outcome.schedule.verify()?;

        assert_eq!(outcome.status, Status::Feasible);
        assert!(outcome.schedule.makespan() <= instance.horizon());
        // machine 1 carries 10 units of work, so no schedule beats that
        assert!(outcome.schedule.makespan() >= 10);

        Ok(())
    }
}
