use super::list;
use crate::core::{Budget, Instance, Outcome, Schedule, Scheduler, Stats, Status, TaskArena};
use std::time::Instant;

/// Exact branch and bound over per machine task orderings.
///
/// Every task carries a start time window `[est, lst]`. Nodes branch on an
/// undecided pair of tasks sharing a machine, trying both orders; after each
/// decision the windows are propagated to a fixpoint over the job precedence
/// chains and the decided orderings. Windows are clamped so that every task
/// finishes before the incumbent makespan, which turns the incumbent into a
/// pruning bound and makes every surviving leaf a strict improvement.
#[derive(Clone, Copy, Debug, Default)]
pub struct BranchAndBound;

/// Per node search state, owned by the node and cloned for its children.
#[derive(Clone, Debug)]
struct Frame {
    est: Vec<u64>,
    lst: Vec<u64>,
    arcs: Vec<(usize, usize)>,
    undecided: Vec<(usize, usize)>,
}

struct Search<'a> {
    arena: &'a TaskArena,
    precedences: Vec<(usize, usize)>,
    best: Vec<u64>,
    best_makespan: u64,
    stats: Stats,
    started: Instant,
    budget: Budget,
    cancelled: bool,
}

impl Search<'_> {
    fn out_of_budget(&self) -> bool {
        self.budget
            .branch_limit
            .is_some_and(|limit| self.stats.branches >= limit)
            || self
                .budget
                .time_limit
                .is_some_and(|limit| self.started.elapsed() >= limit)
    }

    /// Clamps every window so the task finishes before the incumbent.
    /// Returns false when some task can no longer make it.
    fn tighten(&self, frame: &mut Frame) -> bool {
        let Some(limit) = self.best_makespan.checked_sub(1) else {
            return false;
        };

        for task in 0..self.arena.len() {
            let Some(latest) = limit.checked_sub(self.arena.duration(task) + self.arena.tail(task))
            else {
                return false;
            };

            if frame.lst[task] > latest {
                frame.lst[task] = latest;
            }

            if frame.est[task] > frame.lst[task] {
                return false;
            }
        }

        true
    }

    /// Propagates windows over precedence and decided ordering arcs until
    /// nothing moves. Returns false on a contradicted window; orderings that
    /// form a cycle never settle and run into the sweep bound.
    fn propagate(&self, frame: &mut Frame) -> bool {
        for _ in 0..=self.arena.len() {
            let mut changed = false;

            for &(before, after) in self.precedences.iter().chain(&frame.arcs) {
                let earliest = frame.est[before] + self.arena.duration(before);
                if frame.est[after] < earliest {
                    if earliest > frame.lst[after] {
                        return false;
                    }
                    frame.est[after] = earliest;
                    changed = true;
                }

                let Some(latest) = frame.lst[after].checked_sub(self.arena.duration(before)) else {
                    return false;
                };
                if frame.lst[before] > latest {
                    if latest < frame.est[before] {
                        return false;
                    }
                    frame.lst[before] = latest;
                    changed = true;
                }
            }

            if !changed {
                return true;
            }
        }

        false
    }

    /// The larger of the job chain bound and the machine load bound.
    fn lower_bound(&self, frame: &Frame) -> u64 {
        let mut bound = 0;

        for task in 0..self.arena.len() {
            bound = bound.max(frame.est[task] + self.arena.duration(task) + self.arena.tail(task));
        }

        for machine in 0..self.arena.machines() {
            let tasks = self.arena.machine_tasks(machine);
            if tasks.is_empty() {
                continue;
            }

            let release = tasks.iter().map(|&task| frame.est[task]).min().unwrap_or(0);
            let load = tasks.iter().map(|&task| self.arena.duration(task)).sum::<u64>();
            let exit = tasks.iter().map(|&task| self.arena.tail(task)).min().unwrap_or(0);
            bound = bound.max(release + load + exit);
        }

        bound
    }

    /// Picks the undecided pair with the most combined work whose windows
    /// still admit both orders. Ties go to the lowest pair index.
    fn select(&self, frame: &Frame) -> Option<usize> {
        let mut choice: Option<(usize, u64)> = None;

        for (index, &(first, second)) in frame.undecided.iter().enumerate() {
            let first_end = frame.lst[first] + self.arena.duration(first);
            let second_end = frame.lst[second] + self.arena.duration(second);
            if first_end <= frame.est[second] || second_end <= frame.est[first] {
                continue;
            }

            let weight = self.arena.duration(first) + self.arena.duration(second);
            if choice.map_or(true, |(_, current)| weight > current) {
                choice = Some((index, weight));
            }
        }

        choice.map(|(index, _)| index)
    }

    fn descend(&mut self, mut frame: Frame) {
        if self.cancelled {
            return;
        }

        if self.out_of_budget() {
            self.cancelled = true;
            return;
        }

        if !self.tighten(&mut frame) || !self.propagate(&mut frame) {
            self.stats.conflicts += 1;
            return;
        }

        if self.lower_bound(&frame) >= self.best_makespan {
            self.stats.prunes += 1;
            return;
        }

        let Some(index) = self.select(&frame) else {
            // Every machine ordering is settled: the earliest starts form a
            // complete schedule, and the clamped windows make it beat the
            // incumbent.
            let makespan = (0..self.arena.len())
                .map(|task| frame.est[task] + self.arena.duration(task))
                .max()
                .unwrap_or_default();

            if makespan < self.best_makespan {
                self.best_makespan = makespan;
                self.best.clone_from(&frame.est);
            }
            return;
        };

        self.stats.branches += 1;
        let (first, second) = frame.undecided.swap_remove(index);
        let (early, late) = if frame.est[first] <= frame.est[second] {
            (first, second)
        } else {
            (second, first)
        };

        let mut preferred = frame.clone();
        preferred.arcs.push((early, late));
        self.descend(preferred);

        frame.arcs.push((late, early));
        self.descend(frame);
    }
}

impl Scheduler for BranchAndBound {
    fn schedule<'a>(&mut self, instance: &'a Instance, budget: &Budget) -> Outcome<'a> {
        let started = Instant::now();
        let arena = TaskArena::new(instance);

        // Serial incumbent: every task back to back, makespan = horizon.
        let mut best = Vec::with_capacity(arena.len());
        let mut offset = 0;
        for task in 0..arena.len() {
            best.push(offset);
            offset += arena.duration(task);
        }
        let mut best_makespan = offset;

        // The greedy list schedule is a much tighter starting incumbent.
        let greedy: Vec<u64> = list::schedule(instance).into_iter().flatten().collect();
        let greedy_makespan = greedy
            .iter()
            .enumerate()
            .map(|(task, start)| start + arena.duration(task))
            .max()
            .unwrap_or_default();
        if greedy_makespan < best_makespan {
            best = greedy;
            best_makespan = greedy_makespan;
        }

        let mut search = Search {
            arena: &arena,
            precedences: arena.precedence_arcs(),
            best,
            best_makespan,
            stats: Stats::default(),
            started,
            budget: *budget,
            cancelled: false,
        };

        search.descend(Frame {
            est: (0..arena.len()).map(|task| arena.head(task)).collect(),
            lst: vec![instance.horizon(); arena.len()],
            arcs: Vec::new(),
            undecided: arena.disjunctive_pairs(),
        });

        let status = if search.cancelled {
            Status::Feasible
        } else {
            Status::Optimal
        };
        let mut stats = search.stats;
        stats.elapsed = started.elapsed();

        Outcome {
            schedule: Schedule::new(instance, arena.nested_starts(&search.best)),
            status,
            stats,
        }
    }

    fn name(&self) -> &'static str {
        "BranchAndBound"
    }
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::SCHEDULERS)]
static INSTANCE: fn() -> Box<dyn Scheduler> = || Box::new(BranchAndBound);

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::{InstanceError, Task};
    use crate::data::samples;
    use std::time::Duration;

    fn three_machines() -> Result<Instance, InstanceError> {
        Instance::new(
            3,
            vec![
                vec![Task::new(0, 3), Task::new(1, 2), Task::new(2, 2)],
                vec![Task::new(0, 2), Task::new(2, 1), Task::new(1, 4)],
                vec![Task::new(1, 4), Task::new(2, 3)],
            ],
        )
    }

    #[test]
    fn test_branch_and_bound() {
        assert!(samples(true, &mut BranchAndBound).is_ok());
    }

    #[test]
    fn solves_three_machines_to_optimality() -> anyhow::Result<()> {
        let instance = three_machines()?;
        let outcome = BranchAndBound.schedule(&instance, &Budget::default());

        outcome.schedule.verify()?;
        assert_eq!(outcome.status, Status::Optimal);
        assert_eq!(outcome.schedule.makespan(), 11);
        assert!(outcome.schedule.makespan() <= instance.horizon());

        Ok(())
    }

    #[test]
    fn single_task_needs_no_branching() -> anyhow::Result<()> {
        let instance = Instance::new(1, vec![vec![Task::new(0, 7)]])?;
        let outcome = BranchAndBound.schedule(&instance, &Budget::default());

        outcome.schedule.verify()?;
        assert_eq!(outcome.status, Status::Optimal);
        assert_eq!(outcome.schedule.makespan(), 7);
        assert_eq!(outcome.stats.branches, 0);

        Ok(())
    }

    #[test]
    fn single_machine_serializes_all_jobs() -> anyhow::Result<()> {
        let instance = Instance::new(
            1,
            vec![vec![Task::new(0, 2)], vec![Task::new(0, 3)], vec![Task::new(0, 4)]],
        )?;
        let outcome = BranchAndBound.schedule(&instance, &Budget::default());

        outcome.schedule.verify()?;
        assert_eq!(outcome.status, Status::Optimal);
        assert_eq!(outcome.schedule.makespan(), 9);

        Ok(())
    }

    #[test]
    fn optimum_matches_longest_job() -> anyhow::Result<()> {
        let instance = Instance::new(
            2,
            vec![
                vec![Task::new(0, 2), Task::new(1, 2)],
                vec![Task::new(1, 3), Task::new(0, 3)],
            ],
        )?;
        let outcome = BranchAndBound.schedule(&instance, &Budget::default());

        outcome.schedule.verify()?;
        assert_eq!(outcome.status, Status::Optimal);
        assert_eq!(outcome.schedule.makespan(), 6);

        Ok(())
    }

    #[test]
    fn branch_budget_reports_feasible() -> anyhow::Result<()> {
        let instance = three_machines()?;
        let outcome = BranchAndBound.schedule(&instance, &Budget::with_branch_limit(0));

        outcome.schedule.verify()?;
        assert_eq!(outcome.status, Status::Feasible);
        assert!(outcome.schedule.makespan() <= instance.horizon());

        Ok(())
    }

    #[test]
    fn time_budget_reports_feasible() -> anyhow::Result<()> {
        let instance = three_machines()?;
        let budget = Budget::with_time_limit(Duration::ZERO);
        let outcome = BranchAndBound.schedule(&instance, &budget);

        outcome.schedule.verify()?;
        assert_eq!(outcome.status, Status::Feasible);
        assert!(outcome.schedule.makespan() <= instance.horizon());

        Ok(())
    }

    #[test]
    fn repeated_solves_agree() -> anyhow::Result<()> {
        let instance = three_machines()?;
        let first = BranchAndBound.schedule(&instance, &Budget::default());
        let second = BranchAndBound.schedule(&instance, &Budget::default());

        assert_eq!(first.schedule.makespan(), second.schedule.makespan());
        assert_eq!(first.stats.branches, second.stats.branches);

        Ok(())
    }
}
