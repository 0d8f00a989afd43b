//! Instance fixtures.

use ttbench_core::{Event, Instance, Resource, Time};

/// Text form of [`two_by_two`], with a comment and blank lines.
pub const SAMPLE_TEXT: &str = "\
# two classes share one teacher
Times:
T1, Monday 1
T2, Monday 2

Resources:
R1, Class 1A, Class
R2, Class 1B, Class
R3, Alice, Teacher

Events:
E1, Maths 1A, 1, R1, R3
E2, Maths 1B, 1, R2, R3
";

/// XML archive form of [`two_by_two`].
pub const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<HighSchoolTimetableArchive Id="sample">
  <Instances>
    <Instance Id="two_by_two">
      <Times>
        <Time Id="T1"><Name>Monday 1</Name></Time>
        <Time Id="T2"><Name>Monday 2</Name></Time>
      </Times>
      <Resources>
        <Resource Id="R1"><Name>Class 1A</Name><ResourceType Reference="Class"/></Resource>
        <Resource Id="R2"><Name>Class 1B</Name><ResourceType Reference="Class"/></Resource>
        <Resource Id="R3"><Name>Alice</Name><ResourceType Reference="Teacher"/></Resource>
      </Resources>
      <Events>
        <Event Id="E1">
          <Name>Maths 1A</Name>
          <Duration>1</Duration>
          <Resources>
            <Resource Reference="R1"><Role>Class</Role></Resource>
            <Resource Reference="R3"><Role>Teacher</Role></Resource>
          </Resources>
        </Event>
        <Event Id="E2">
          <Name>Maths 1B</Name>
          <Duration>1</Duration>
          <Resources>
            <Resource Reference="R2"><Role>Class</Role></Resource>
            <Resource Reference="R3"><Role>Teacher</Role></Resource>
          </Resources>
        </Event>
      </Events>
    </Instance>
  </Instances>
</HighSchoolTimetableArchive>
"#;

/// Text form of an instance whose event references a missing teacher.
pub const UNRESOLVED_TEXT: &str = "\
Times:
T1, Monday 1
Resources:
R1, Class 1A, Class
Events:
E1, Maths, 1, R1, R9
";

/// Two times, two classes, one teacher, two events.
pub fn two_by_two() -> Instance {
    Instance::new(
        "two_by_two",
        vec![Time::new("T1", "Monday 1"), Time::new("T2", "Monday 2")],
        vec![
            Resource::class("R1", "Class 1A"),
            Resource::class("R2", "Class 1B"),
            Resource::teacher("R3", "Alice"),
        ],
        vec![
            Event::new("E1", "Maths 1A", 1, "R1", "R3"),
            Event::new("E2", "Maths 1B", 1, "R2", "R3"),
        ],
    )
    .expect("fixture is valid")
}

/// `events` one-slot events of a single class and teacher over `times` slots.
///
/// Ids are `E0..` and `T0..`.
pub fn grid_instance(name: &str, events: usize, times: usize) -> Instance {
    Instance::new(
        name,
        (0..times)
            .map(|t| Time::new(format!("T{}", t), format!("slot {}", t)))
            .collect(),
        vec![Resource::class("C", "1A"), Resource::teacher("P", "Alice")],
        (0..events)
            .map(|e| Event::new(format!("E{}", e), format!("lesson {}", e), 1, "C", "P"))
            .collect(),
    )
    .expect("fixture is valid")
}
