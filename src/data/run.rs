use crate::core::{Budget, Scheduler};
use crate::data::deserialize;
use anyhow::anyhow;
use std::fmt::{Display, Formatter, Result};
use std::fs::File;
use std::io::BufReader;

/// Report of running a directory of samples.
#[derive(Debug)]
pub struct Report {
    scheduler: String,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Create a new report.
    fn new(scheduler: String) -> Self {
        let entries = Vec::new();
        Self { scheduler, entries }
    }

    /// Get the scheduler name.
    #[must_use]
    pub fn scheduler_name(&self) -> &str {
        &self.scheduler
    }

    /// Get the entries.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Scheduler: {}", self.scheduler)?;
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        writeln!(f, "-------------------")
    }
}

/// Report of running a single sample.
#[non_exhaustive]
#[derive(Debug)]
pub struct ReportEntry {
    pub name: String,
    pub makespan: u64,
    pub optimal: bool,
    pub branches: u64,
    pub time: f64,
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let status = if self.optimal { "optimal" } else { "feasible" };
        write!(
            f,
            "{}: makespan {} ({status}, {} branches) in {:.2} sec",
            self.name, self.makespan, self.branches, self.time
        )
    }
}

/// Run all samples in the `samples` directory.
/// Print the report to stdout.
///
/// # Arguments
/// - `valid` is true, check optimal results against the expected makespan.
/// - `scheduler` is the scheduler to run.
///
/// # Errors
/// - If a file cannot be read.
/// - If no samples are found.
///
/// # Panics
/// - If the schedule is invalid.
/// - If the makespan is incorrect and `valid` is true.
pub fn samples(valid: bool, scheduler: &mut dyn Scheduler) -> anyhow::Result<()> {
    run("samples", valid, scheduler, &Budget::default()).and_then(|report| {
        if report.entries.is_empty() {
            Err(anyhow!("No samples found"))
        } else {
            println!("{report}");
            Ok(())
        }
    })
}

/// Run all samples in the `dir` directory.
///
/// # Arguments
/// - `valid` is true, check optimal results against the expected makespan.
/// - `scheduler` is the scheduler to run.
/// - `budget` limits the work spent on every sample.
///
/// # Errors
/// - If a file cannot be read or does not match its filename.
///
/// # Panics
/// - If the schedule is invalid.
/// - If the makespan is incorrect and `valid` is true.
pub fn run(
    dir: &str,
    valid: bool,
    scheduler: &mut dyn Scheduler,
    budget: &Budget,
) -> anyhow::Result<Report> {
    let mut report = Report::new(scheduler.name().into());

    for file in std::fs::read_dir(dir)? {
        let file = file?;
        let (name, machines, expected) = parse_filename(&file.file_name())?;

        let instance: crate::core::Instance =
            deserialize(&mut BufReader::new(File::open(file.path())?))?;
        anyhow::ensure!(
            instance.machines == machines,
            "Sample {name} declares {machines} machines"
        );

        let time = std::time::Instant::now();
        let outcome = scheduler.schedule(&instance, budget);
        let time = time.elapsed().as_secs_f64();

        if let Err(error) = outcome.schedule.verify() {
            unreachable!(
                "{} produced an invalid schedule for {name}: {error}",
                scheduler.name()
            );
        }

        let makespan = outcome.schedule.makespan();
        if valid && outcome.status.is_optimal() {
            assert_eq!(makespan, expected, "Wrong makespan for {name}");
        }

        report.entries.push(ReportEntry {
            name,
            makespan,
            optimal: outcome.status.is_optimal(),
            branches: outcome.stats.branches,
            time,
        });
    }

    Ok(report)
}

fn parse_filename(filename: &std::ffi::OsString) -> anyhow::Result<(String, usize, u64)> {
    static NAME_ERR: &str = "Cannot read filename";

    let name = filename.to_str().ok_or_else(|| anyhow!(NAME_ERR))?;
    let mut parts = name.split('.');
    let mut parts = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.split('_');
    let machines = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    let expected = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    let _: usize = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    Ok((name.into(), machines, expected))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_filename() -> anyhow::Result<()> {
        let filename = "3_11_0.in".into();
        let (name, machines, expected) = parse_filename(&filename)?;
        assert_eq!(name, "3_11_0.in");
        assert_eq!(machines, 3);
        assert_eq!(expected, 11);

        let filename = "10_1234_7.in".into();
        let (name, machines, expected) = parse_filename(&filename)?;
        assert_eq!(name, "10_1234_7.in");
        assert_eq!(machines, 10);
        assert_eq!(expected, 1234);
        Ok(())
    }

    #[test]
    fn test_parse_filename_errors() {
        assert!(parse_filename(&"".into()).is_err());
        assert!(parse_filename(&".in".into()).is_err());
        assert!(parse_filename(&"10.in".into()).is_err());
        assert!(parse_filename(&"10_1234.in".into()).is_err());
        assert!(parse_filename(&"10_1a234_0.in".into()).is_err());
        assert!(parse_filename(&"1a0_1234_0.in".into()).is_err());
        assert!(parse_filename(&"10_1234_0a2.in".into()).is_err());
    }
}
