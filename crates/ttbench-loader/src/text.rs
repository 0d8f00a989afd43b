//! Sectioned, comma-delimited instance files.

use tracing::debug;
use ttbench_core::{Event, Instance, Resource, ResourceKind, Time, ValidationError};

use crate::{InstanceLoader, LoadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Times,
    Resources,
    Events,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        let header = line.strip_suffix(':')?.trim();
        if header.eq_ignore_ascii_case("times") {
            Some(Section::Times)
        } else if header.eq_ignore_ascii_case("resources") {
            Some(Section::Resources)
        } else if header.eq_ignore_ascii_case("events") {
            Some(Section::Events)
        } else {
            None
        }
    }
}

/// Loader for the `Times:` / `Resources:` / `Events:` text format.
///
/// - `Times:` rows are `id, name` (the name may contain commas);
/// - `Resources:` rows are `id, name, kind`;
/// - `Events:` rows are `id, name, duration, class, teacher`.
///
/// Blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLoader;

impl TextLoader {
    pub fn new() -> Self {
        Self
    }
}

impl InstanceLoader for TextLoader {
    fn load_str(&self, name: &str, input: &str) -> Result<Instance, LoadError> {
        let mut section = None;
        let mut times = Vec::new();
        let mut resources = Vec::new();
        let mut events = Vec::new();

        for (index, raw) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(next) = Section::from_header(line) {
                section = Some(next);
                continue;
            }

            match section {
                None => {
                    return Err(parse_error(
                        line_no,
                        "data before any 'Times:', 'Resources:' or 'Events:' header",
                    ))
                }
                Some(Section::Times) => times.push(parse_time(line)),
                Some(Section::Resources) => resources.push(parse_resource(line, line_no)?),
                Some(Section::Events) => events.push(parse_event(line, line_no)?),
            }
        }

        debug!(
            event = "instance_parsed",
            instance = name,
            times = times.len() as u64,
            resources = resources.len() as u64,
            events = events.len() as u64,
        );

        Ok(Instance::new(name, times, resources, events)?)
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> LoadError {
    LoadError::Parse {
        line,
        message: message.into(),
    }
}

fn fields(line: &str, n: usize) -> Vec<&str> {
    line.splitn(n, ',').map(str::trim).collect()
}

fn parse_time(line: &str) -> Time {
    let parts = fields(line, 2);
    Time::new(parts[0], parts.get(1).copied().unwrap_or(""))
}

fn parse_resource(line: &str, line_no: usize) -> Result<Resource, LoadError> {
    let parts = fields(line, 3);
    let [id, name, kind] = parts[..] else {
        return Err(parse_error(
            line_no,
            format!("expected 'id, name, kind', found '{}'", line),
        ));
    };
    Ok(Resource::new(id, name, ResourceKind::from_tag(kind)))
}

fn parse_event(line: &str, line_no: usize) -> Result<Event, LoadError> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let [id, name, duration, class_ref, teacher_ref] = parts[..] else {
        return Err(parse_error(
            line_no,
            format!(
                "expected 'id, name, duration, class, teacher', found {} fields",
                parts.len()
            ),
        ));
    };

    let duration: i64 = duration
        .parse()
        .map_err(|_| parse_error(line_no, format!("invalid duration '{}'", duration)))?;
    if duration <= 0 {
        return Err(ValidationError::NonPositiveDuration {
            event: id.to_string(),
            duration,
        }
        .into());
    }
    let duration = u32::try_from(duration)
        .map_err(|_| parse_error(line_no, format!("duration {} is too large", duration)))?;

    Ok(Event::new(id, name, duration, class_ref, teacher_ref))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = "\
# two slots, one class, one teacher
Times:
T1, Monday, first period
T2, Monday 2

Resources:
R1, Class 1A, Class
R2, Alice, teacher
R3, Lab, Room
Events:
E1, Maths, 1, R1, R2
E2, Physics, 2, R1, R2
";

    #[test]
    fn test_sample() {
        let instance = TextLoader::new().load_str("sample", SAMPLE).unwrap();

        assert_eq!(instance.name(), "sample");
        assert_eq!(instance.time_count(), 2);
        assert_eq!(instance.time("T1").unwrap().name, "Monday, first period");
        assert_eq!(
            instance.resource("R3").unwrap().kind.to_string(),
            "Room".to_string()
        );
        assert_eq!(instance.event("E2").unwrap().duration, 2);
        assert_eq!(instance.event("E2").unwrap().class_ref, "R1");
    }

    #[test]
    fn test_data_before_header() {
        let err = TextLoader::new().load_str("bad", "T1, Mon\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_short_event_row() {
        let input = "Times:\nT1\nResources:\nR1, A, Class\nR2, B, Teacher\nEvents:\nE1, Maths, 1, R1\n";
        let err = TextLoader::new().load_str("short", input).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 7, .. }));
    }

    #[test]
    fn test_bad_duration() {
        let input = "Events:\nE1, Maths, one, R1, R2\n";
        let err = TextLoader::new().load_str("nan", input).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, ref message } if message.contains("one")));
    }

    #[test]
    fn test_negative_duration_is_validation_error() {
        let input = "Resources:\nR1, A, Class\nR2, B, Teacher\nEvents:\nE1, Maths, -2, R1, R2\n";
        let err = TextLoader::new().load_str("neg", input).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::NonPositiveDuration { duration: -2, .. })
        ));
    }

    #[test]
    fn test_unresolved_reference() {
        let input = "Times:\nT1\nResources:\nR1, A, Class\nEvents:\nE1, Maths, 1, R1, R9\n";
        let err = TextLoader::new().load_str("dangling", input).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::UnresolvedResource { .. })
        ));
    }

    #[test]
    fn test_load_names_instance_after_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BrazilInstance1.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();

        let instance = TextLoader::new().load(&path).unwrap();
        assert_eq!(instance.name(), "BrazilInstance1");
    }

    #[test]
    fn test_missing_file() {
        let err = TextLoader::new()
            .load(std::path::Path::new("/nonexistent/instance.txt"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
