use crate::core::Schedule;

const COLUMN: usize = 15;

/// Renders a schedule as two aligned rows per machine: the tasks in running
/// order, and the time window each one occupies.
#[must_use]
pub fn render(schedule: &Schedule) -> String {
    let mut output = String::new();

    for (machine, tasks) in schedule.by_machine().iter().enumerate() {
        let mut names = format!("Machine {machine}: ");
        let mut windows = " ".repeat(names.len());

        for task in tasks {
            push_column(&mut names, &format!("job_{}_task_{}", task.job, task.task));
            push_column(&mut windows, &format!("[{},{}]", task.start, task.end));
        }

        output.push_str(names.trim_end());
        output.push('\n');
        output.push_str(windows.trim_end());
        output.push('\n');
    }

    output
}

fn push_column(line: &mut String, cell: &str) {
    line.push_str(cell);
    for _ in cell.len()..COLUMN {
        line.push(' ');
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::{Instance, Task};

    #[test]
    fn renders_aligned_columns() -> anyhow::Result<()> {
        let instance = Instance::new(
            3,
            vec![
                vec![Task::new(0, 3), Task::new(1, 2), Task::new(2, 2)],
                vec![Task::new(0, 2), Task::new(2, 1), Task::new(1, 4)],
                vec![Task::new(1, 4), Task::new(2, 3)],
            ],
        )?;
        let schedule = Schedule::new(&instance, vec![vec![0, 4, 6], vec![3, 5, 7], vec![0, 8]]);
        schedule.verify()?;

        let expected = "\
Machine 0: job_0_task_0   job_1_task_0
           [0,3]          [3,5]
Machine 1: job_2_task_0   job_0_task_1   job_1_task_2
           [0,4]          [4,6]          [7,11]
Machine 2: job_1_task_1   job_0_task_2   job_2_task_1
           [5,6]          [6,8]          [8,11]
";

        assert_eq!(render(&schedule), expected);

        Ok(())
    }
}
