use super::Instance;

/// Dense index over every task of an instance.
///
/// Tasks are numbered job by job, so per task data lives in flat arrays
/// addressed directly by task id and the propagation sweeps never hash.
/// Built once per solve and never resized.
#[derive(Clone, Debug)]
pub struct TaskArena {
    firsts: Vec<usize>,
    machine: Vec<usize>,
    duration: Vec<u64>,
    job: Vec<usize>,
    head: Vec<u64>,
    tail: Vec<u64>,
    machine_tasks: Vec<Vec<usize>>,
}

impl TaskArena {
    /// Builds the arena for the given instance.
    #[must_use]
    pub fn new(instance: &Instance) -> Self {
        let count = instance.task_count();
        let mut firsts = Vec::with_capacity(instance.jobs.len() + 1);
        let mut machine = Vec::with_capacity(count);
        let mut duration = Vec::with_capacity(count);
        let mut job = Vec::with_capacity(count);
        let mut head = Vec::with_capacity(count);
        let mut tail = vec![0; count];
        let mut machine_tasks = vec![Vec::new(); instance.machines];

        for (id, tasks) in instance.jobs.iter().enumerate() {
            firsts.push(machine.len());

            let mut offset = 0;
            for task in tasks {
                machine_tasks[task.machine].push(machine.len());
                machine.push(task.machine);
                duration.push(task.duration);
                job.push(id);
                head.push(offset);
                offset += task.duration;
            }

            let mut remaining = 0;
            for task in (0..tasks.len()).rev() {
                tail[firsts[id] + task] = remaining;
                remaining += tasks[task].duration;
            }
        }

        firsts.push(machine.len());

        Self {
            firsts,
            machine,
            duration,
            job,
            head,
            tail,
            machine_tasks,
        }
    }

    /// Number of tasks in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.machine.len()
    }

    /// Returns whether the arena holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.machine.is_empty()
    }

    /// Number of machines of the underlying instance.
    #[must_use]
    pub fn machines(&self) -> usize {
        self.machine_tasks.len()
    }

    /// Dense id of the given task.
    #[must_use]
    pub fn id(&self, job: usize, task: usize) -> usize {
        self.firsts[job] + task
    }

    /// Job the task belongs to.
    #[must_use]
    pub fn job(&self, id: usize) -> usize {
        self.job[id]
    }

    /// Position of the task within its job.
    #[must_use]
    pub fn position(&self, id: usize) -> usize {
        id - self.firsts[self.job[id]]
    }

    /// Machine the task runs on.
    #[must_use]
    pub fn machine(&self, id: usize) -> usize {
        self.machine[id]
    }

    /// Processing time of the task.
    #[must_use]
    pub fn duration(&self, id: usize) -> u64 {
        self.duration[id]
    }

    /// Work preceding the task in its job: its earliest possible start.
    #[must_use]
    pub fn head(&self, id: usize) -> u64 {
        self.head[id]
    }

    /// Work remaining in the job after the task completes.
    #[must_use]
    pub fn tail(&self, id: usize) -> u64 {
        self.tail[id]
    }

    /// Tasks running on the given machine, in dense id order.
    #[must_use]
    pub fn machine_tasks(&self, machine: usize) -> &[usize] {
        &self.machine_tasks[machine]
    }

    /// Arcs `(task, successor)` of every job precedence chain.
    #[must_use]
    pub fn precedence_arcs(&self) -> Vec<(usize, usize)> {
        let mut arcs = Vec::with_capacity(self.len().saturating_sub(self.firsts.len() - 1));

        for pair in self.firsts.windows(2) {
            for task in pair[0]..pair[1].saturating_sub(1) {
                arcs.push((task, task + 1));
            }
        }

        arcs
    }

    /// Unordered pairs of tasks from different jobs sharing a machine.
    /// Same-job pairs are left out: the precedence chain already orders them.
    #[must_use]
    pub fn disjunctive_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();

        for tasks in &self.machine_tasks {
            for (index, &first) in tasks.iter().enumerate() {
                for &second in &tasks[index + 1..] {
                    if self.job[first] != self.job[second] {
                        pairs.push((first, second));
                    }
                }
            }
        }

        pairs
    }

    /// Groups dense start times back into per job lists.
    #[must_use]
    pub fn nested_starts(&self, starts: &[u64]) -> Vec<Vec<u64>> {
        self.firsts
            .windows(2)
            .map(|pair| starts[pair[0]..pair[1]].to_vec())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::Task;

    fn arena() -> Result<(Instance, TaskArena), crate::core::InstanceError> {
        let instance = Instance::new(
            2,
            vec![
                vec![Task::new(0, 3), Task::new(1, 2)],
                vec![Task::new(1, 4), Task::new(0, 1)],
            ],
        )?;
        let arena = TaskArena::new(&instance);

        Ok((instance, arena))
    }

    #[test]
    fn indexes_tasks_job_major() -> anyhow::Result<()> {
        let (_, arena) = arena()?;

        assert_eq!(arena.len(), 4);
        assert_eq!(arena.id(1, 0), 2);
        assert_eq!(arena.job(2), 1);
        assert_eq!(arena.position(3), 1);
        assert_eq!(arena.machine(3), 0);
        assert_eq!(arena.duration(2), 4);

        Ok(())
    }

    #[test]
    fn computes_heads_and_tails() -> anyhow::Result<()> {
        let (_, arena) = arena()?;

        assert_eq!(arena.head(0), 0);
        assert_eq!(arena.head(1), 3);
        assert_eq!(arena.tail(0), 2);
        assert_eq!(arena.tail(1), 0);
        assert_eq!(arena.tail(2), 1);

        Ok(())
    }

    #[test]
    fn groups_tasks_by_machine() -> anyhow::Result<()> {
        let (_, arena) = arena()?;

        assert_eq!(arena.machines(), 2);
        assert_eq!(arena.machine_tasks(0), &[0, 3]);
        assert_eq!(arena.machine_tasks(1), &[1, 2]);

        Ok(())
    }

    #[test]
    fn lists_arcs_and_pairs() -> anyhow::Result<()> {
        let (_, arena) = arena()?;

        assert_eq!(arena.precedence_arcs(), vec![(0, 1), (2, 3)]);
        assert_eq!(arena.disjunctive_pairs(), vec![(0, 3), (1, 2)]);

        Ok(())
    }

    #[test]
    fn rebuilds_nested_starts() -> anyhow::Result<()> {
        let (_, arena) = arena()?;

        let nested = arena.nested_starts(&[0, 4, 0, 6]);
        assert_eq!(nested, vec![vec![0, 4], vec![0, 6]]);

        Ok(())
    }
}
