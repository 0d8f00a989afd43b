//! Validated timetabling instances.
//!
//! An [`Instance`] is built once from ordered sequences of times, resources
//! and events, and is read-only afterwards. Construction checks every
//! invariant the model builder relies on, so downstream code never has to
//! re-validate references.

mod entity;


use std::collections::HashMap;

pub use entity::{Event, Resource, ResourceKind, Time};

use crate::error::{Result, ValidationError};

/// The complete, validated set of times, resources and events for one
/// timetabling problem.
///
/// # Example
///
/// ```
/// use ttbench_core::{Event, Instance, Resource, Time};
///
/// let instance = Instance::new(
///     "tiny",
///     vec![Time::new("T1", "Mon 1"), Time::new("T2", "Mon 2")],
///     vec![Resource::class("R1", "1A"), Resource::teacher("R2", "Alice")],
///     vec![Event::new("E1", "Maths", 1, "R1", "R2")],
/// )
/// .unwrap();
///
/// assert_eq!(instance.time_count(), 2);
/// assert_eq!(instance.event("E1").unwrap().teacher_ref, "R2");
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    times: Vec<Time>,
    resources: Vec<Resource>,
    events: Vec<Event>,
    time_index: HashMap<String, usize>,
    resource_index: HashMap<String, usize>,
    event_index: HashMap<String, usize>,
}

impl Instance {
    /// Creates an instance, validating identifiers, references and durations.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for the first violated invariant.
    pub fn new(
        name: impl Into<String>,
        times: Vec<Time>,
        resources: Vec<Resource>,
        events: Vec<Event>,
    ) -> Result<Self> {
        let time_index =
            index_by_id(&times, "time", |t| &t.id, ValidationError::DuplicateTime)?;
        let resource_index = index_by_id(
            &resources,
            "resource",
            |r| &r.id,
            ValidationError::DuplicateResource,
        )?;
        let event_index =
            index_by_id(&events, "event", |e| &e.id, ValidationError::DuplicateEvent)?;

        for event in &events {
            if event.duration == 0 {
                return Err(ValidationError::NonPositiveDuration {
                    event: event.id.clone(),
                    duration: 0,
                });
            }
            check_reference(
                event,
                &event.class_ref,
                ResourceKind::Class,
                &resources,
                &resource_index,
            )?;
            check_reference(
                event,
                &event.teacher_ref,
                ResourceKind::Teacher,
                &resources,
                &resource_index,
            )?;
        }

        Ok(Self {
            name: name.into(),
            times,
            resources,
            events,
            time_index,
            resource_index,
            event_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn times(&self) -> &[Time] {
        &self.times
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn time_count(&self) -> usize {
        self.times.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Looks up a time by identifier.
    pub fn time(&self, id: &str) -> Option<&Time> {
        self.time_index.get(id).map(|&i| &self.times[i])
    }

    /// Looks up a resource by identifier.
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resource_index.get(id).map(|&i| &self.resources[i])
    }

    /// Looks up an event by identifier.
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.event_index.get(id).map(|&i| &self.events[i])
    }

    /// Returns the position of a time in [`times`](Self::times).
    pub fn time_index(&self, id: &str) -> Option<usize> {
        self.time_index.get(id).copied()
    }

    /// Returns the position of an event in [`events`](Self::events).
    pub fn event_index(&self, id: &str) -> Option<usize> {
        self.event_index.get(id).copied()
    }

    /// Returns the resources of the given kind, in instance order.
    pub fn resources_of_kind<'a>(
        &'a self,
        kind: &'a ResourceKind,
    ) -> impl Iterator<Item = &'a Resource> + 'a {
        self.resources.iter().filter(move |r| &r.kind == kind)
    }
}

fn index_by_id<T>(
    items: &[T],
    kind: &'static str,
    id_of: impl Fn(&T) -> &String,
    duplicate: impl Fn(String) -> ValidationError,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let id = id_of(item);
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId { kind });
        }
        if index.insert(id.clone(), position).is_some() {
            return Err(duplicate(id.clone()));
        }
    }
    Ok(index)
}

fn check_reference(
    event: &Event,
    reference: &str,
    expected: ResourceKind,
    resources: &[Resource],
    index: &HashMap<String, usize>,
) -> Result<()> {
    let Some(&position) = index.get(reference) else {
        return Err(ValidationError::UnresolvedResource {
            event: event.id.clone(),
            reference: reference.to_string(),
        });
    };
    let found = &resources[position].kind;
    if *found != expected {
        return Err(ValidationError::WrongResourceKind {
            event: event.id.clone(),
            reference: reference.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }
    Ok(())
}
