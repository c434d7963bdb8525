use clap::{Parser, ValueEnum};
use jobshop_scheduling::core::{Budget, Instance, Scheduler, Task};
use jobshop_scheduling::{algo, data, run_reader};
use rand::prelude::*;
use std::io::Write;
use std::num::NonZero;
use std::time::Duration;

#[derive(Copy, Clone, Debug)]
struct Algorithm(usize, &'static str);

impl From<Algorithm> for Box<dyn Scheduler> {
    fn from(value: Algorithm) -> Box<dyn Scheduler> {
        algo::SCHEDULERS[value.0]()
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.1)
    }
}

impl ValueEnum for Algorithm {
    fn value_variants<'a>() -> &'a [Self] {
        static ALGORITHMS: std::sync::LazyLock<Vec<Algorithm>> = std::sync::LazyLock::new(|| {
            let iter = algo::SCHEDULERS.iter().enumerate();
            iter.map(|(i, init)| Algorithm(i, init().name())).collect()
        });

        ALGORITHMS.as_slice()
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.1))
    }
}

/// Application solving the job shop scheduling problem.
#[derive(Debug, Parser)]
enum Application {
    /// Run one of the implemented algorithms on an instance read from stdin.
    Run {
        algorithm: Algorithm,
        /// Time limit in milliseconds. Without it the search runs until the
        /// schedule is provably optimal.
        #[clap(short, long)]
        time_limit: Option<u64>,
        /// Maximum number of explored ordering decisions.
        #[clap(short, long)]
        branch_limit: Option<u64>,
    },
    /// Run benchmarks on a set of instances.
    Bench {
        /// The input directory.
        input: String,
        /// Exclude scheduling algorithms.
        #[clap(short, long, value_delimiter = ',')]
        exclude: Vec<Algorithm>,
        /// Time limit per instance in milliseconds.
        #[clap(short, long)]
        time_limit: Option<u64>,
    },
    /// Generate test cases for the scheduling problem.
    Gen {
        /// The number of machines. Every job visits each machine once.
        machines: NonZero<usize>,
        /// The number of jobs.
        jobs: NonZero<usize>,
        /// The maximum processing time of a task.
        max_duration: NonZero<u64>,
        /// Number of test cases to generate.
        #[clap(short, long, default_value = "1")]
        amount: NonZero<u64>,
        /// Path to output the generated instances. If the directory does not exist, it will be created.
        #[clap(short, long, default_value = "output")]
        output: String,
    },
}

fn schedulers(exclude: &[Algorithm]) -> impl Iterator<Item = Box<dyn Scheduler>> + '_ {
    let iter = algo::SCHEDULERS.iter().map(|init| init());
    iter.filter(|scheduler| !exclude.iter().any(|name| name.1 == scheduler.name()))
}

fn budget(time_limit: Option<u64>, branch_limit: Option<u64>) -> Budget {
    Budget {
        time_limit: time_limit.map(Duration::from_millis),
        branch_limit,
    }
}

fn gen_jobs(machines: usize, jobs: usize, max_duration: u64) -> Vec<Vec<Task>> {
    let mut rng = thread_rng();
    let mut result = Vec::with_capacity(jobs);

    for _ in 0..jobs {
        let mut order: Vec<usize> = (0..machines).collect();
        order.shuffle(&mut rng);

        let job = order
            .into_iter()
            .map(|machine| Task::new(machine, rng.gen_range(1..=max_duration)))
            .collect();
        result.push(job);
    }

    result
}

fn main() -> anyhow::Result<()> {
    match Application::parse() {
        Application::Run {
            algorithm,
            time_limit,
            branch_limit,
        } => {
            let mut scheduler = Box::<dyn Scheduler>::from(algorithm);
            let budget = budget(time_limit, branch_limit);
            run_reader(scheduler.as_mut(), &budget, &mut std::io::stdin().lock())
        }
        Application::Bench {
            input,
            exclude,
            time_limit,
        } => {
            let budget = budget(time_limit, None);
            for mut scheduler in schedulers(&exclude) {
                println!("{}", data::run(&input, false, scheduler.as_mut(), &budget)?);
            }
            Ok(())
        }
        Application::Gen {
            machines,
            jobs,
            max_duration,
            amount,
            output,
        } => {
            let machines = machines.get();

            let output = std::path::Path::new(&output);
            if !output.try_exists()? {
                std::fs::create_dir_all(output)?;
            }

            for i in 0..amount.get() {
                let instance = Instance::new(
                    machines,
                    gen_jobs(machines, jobs.get(), max_duration.get()),
                )?;
                let filename = format!("{machines}_0_{i}.in");
                std::fs::File::create(output.join(filename))?
                    .write_all(data::to_string(&instance)?.as_bytes())?;
            }
            Ok(())
        }
    }
}
