//! Times, resources and events.

use std::fmt;
use std::str::FromStr;

/// A discrete schedulable time slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub id: String,
    pub name: String,
}

impl Time {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Category of a resource.
///
/// Events reference exactly one `Class` and one `Teacher`. Other categories
/// (rooms, for instance) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Class,
    Teacher,
    Other(String),
}

impl ResourceKind {
    /// Parses a kind tag. Known tags match case-insensitively.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("class") {
            ResourceKind::Class
        } else if tag.eq_ignore_ascii_case("teacher") {
            ResourceKind::Teacher
        } else {
            ResourceKind::Other(tag.to_string())
        }
    }

    /// Returns the tag as written in instance files.
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Class => "Class",
            ResourceKind::Teacher => "Teacher",
            ResourceKind::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = std::convert::Infallible;

    /// # Example
    ///
    /// ```
    /// use ttbench_core::ResourceKind;
    ///
    /// assert_eq!("teacher".parse::<ResourceKind>().unwrap(), ResourceKind::Teacher);
    /// assert_eq!(
    ///     "Room".parse::<ResourceKind>().unwrap(),
    ///     ResourceKind::Other("Room".to_string())
    /// );
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

/// A schedulable entity consumed by events.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub kind: ResourceKind,
}

impl Resource {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    pub fn class(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ResourceKind::Class)
    }

    pub fn teacher(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ResourceKind::Teacher)
    }
}

/// A unit of instruction: one class, one teacher, a duration in time units.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub id: String,
    pub name: String,
    pub duration: u32,
    pub class_ref: String,
    pub teacher_ref: String,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration: u32,
        class_ref: impl Into<String>,
        teacher_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            class_ref: class_ref.into(),
            teacher_ref: teacher_ref.into(),
        }
    }
}
