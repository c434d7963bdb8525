mod de;
mod error;
mod render;
mod run;
mod ser;

pub use de::{deserialize, from_str};
pub use error::Error;
pub use render::render;
pub use run::{run, samples, Report, ReportEntry};
pub use ser::to_string;

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::{Instance, InstanceError, Task};

    #[test]
    fn round_trips_instances() -> anyhow::Result<()> {
        let instance = Instance::new(
            3,
            vec![
                vec![Task::new(0, 3), Task::new(1, 2), Task::new(2, 2)],
                vec![Task::new(0, 2), Task::new(2, 1), Task::new(1, 4)],
                vec![Task::new(1, 4), Task::new(2, 3)],
            ],
        )?;

        let text = to_string(&instance)?;
        let parsed: Instance = from_str(&text)?;
        assert_eq!(parsed, instance);

        Ok(())
    }

    #[test]
    fn accepts_any_whitespace_layout() -> anyhow::Result<()> {
        let text = "2\n2\n2  0 2  1 2\n2  1 3  0 3\n";
        let packed = "2 2 2 0 2 1 2 2 1 3 0 3";

        let pretty: Instance = from_str(text)?;
        let compact: Instance = from_str(packed)?;
        assert_eq!(pretty, compact);
        assert_eq!(pretty.machines, 2);
        assert_eq!(pretty.jobs[1], vec![Task::new(1, 3), Task::new(0, 3)]);

        Ok(())
    }

    #[test]
    fn rejects_truncated_input() {
        let result: Result<Instance, Error> = from_str("2 2 2 0 2 1");
        assert!(matches!(result, Err(Error::Eof)));
    }

    #[test]
    fn rejects_trailing_tokens() {
        let result: Result<Instance, Error> = from_str("1 1 1 0 5 99");
        assert!(matches!(result, Err(Error::TrailingTokens)));
    }

    #[test]
    fn rejects_bad_integers() {
        let result: Result<Instance, Error> = from_str("1 1 1 0 five");
        assert!(matches!(result, Err(Error::Integer(_))));
    }

    #[test]
    fn rejects_invalid_instances() {
        // zero duration surfaces through the validating deserialization
        let result: Result<Instance, Error> = from_str("1 1 1 0 0");
        let expected = InstanceError::ZeroDuration { job: 0, task: 0 }.to_string();
        assert!(matches!(result, Err(Error::Message(message)) if message == expected));
    }
}
