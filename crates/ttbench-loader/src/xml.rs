//! XHSTT-style XML instance files.

use std::collections::HashMap;

use roxmltree::{Document, Node};
use tracing::debug;
use ttbench_core::{Event, Instance, Resource, ResourceKind, Time, ValidationError};

use crate::{InstanceLoader, LoadError};

/// Loader for high-school timetabling archives in XML.
///
/// Reads the first `<Instance>` of the archive (or the document root when
/// there is none) and takes its direct `<Times>`, `<Resources>` and
/// `<Events>` children:
///
/// ```xml
/// <Times>
///   <Time Id="Mo_1"><Name>Monday 1</Name></Time>
/// </Times>
/// <Resources>
///   <Resource Id="C1"><Name>1A</Name><ResourceType Reference="Class"/></Resource>
///   <Resource Id="P1"><Name>Alice</Name><ResourceType Reference="Teacher"/></Resource>
/// </Resources>
/// <Events>
///   <Event Id="E1">
///     <Name>Maths</Name>
///     <Duration>2</Duration>
///     <Resources>
///       <Resource Reference="C1"><Role>Class</Role></Resource>
///       <Resource Reference="P1"><Role>Teacher</Role></Resource>
///     </Resources>
///   </Event>
/// </Events>
/// ```
///
/// An event resource's role comes from a `Role` attribute or child, then
/// from its `ResourceType`, then from the kind of the referenced resource.
/// Roles other than `Class` and `Teacher` are ignored. Time groups,
/// resource groups and constraints are skipped.
#[derive(Debug, Clone, Default)]
pub struct XmlLoader {
    instance_id: Option<String>,
}

impl XmlLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the `<Instance Id="...">` to read from a multi-instance archive.
    pub fn with_instance_id(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }
}

impl InstanceLoader for XmlLoader {
    fn load_str(&self, name: &str, input: &str) -> Result<Instance, LoadError> {
        let doc = Document::parse(input).map_err(|err| LoadError::Parse {
            line: err.pos().row as usize,
            message: err.to_string(),
        })?;
        let reader = Reader { doc: &doc };

        let container = reader.instance(self.instance_id.as_deref())?;
        let times = reader.times(container);
        let resources = reader.resources(container);
        let kinds: HashMap<&str, &ResourceKind> = resources
            .iter()
            .map(|r| (r.id.as_str(), &r.kind))
            .collect();
        let events = reader.events(container, &kinds)?;

        debug!(
            event = "instance_parsed",
            instance = name,
            format = "xml",
            times = times.len() as u64,
            resources = resources.len() as u64,
            events = events.len() as u64,
        );

        Ok(Instance::new(name, times, resources, events)?)
    }
}

struct Reader<'a, 'input> {
    doc: &'a Document<'input>,
}

impl<'a, 'input> Reader<'a, 'input> {
    fn line(&self, node: Node) -> usize {
        self.doc.text_pos_at(node.range().start).row as usize
    }

    fn error(&self, node: Node, message: impl Into<String>) -> LoadError {
        LoadError::Parse {
            line: self.line(node),
            message: message.into(),
        }
    }

    fn instance(&self, id: Option<&str>) -> Result<Node<'a, 'input>, LoadError> {
        let root = self.doc.root_element();
        let mut instances = root
            .descendants()
            .filter(|n| n.has_tag_name("Instance"));
        match id {
            Some(id) => instances
                .find(|n| n.attribute("Id") == Some(id))
                .ok_or_else(|| self.error(root, format!("no <Instance Id=\"{}\">", id))),
            None => Ok(instances.next().unwrap_or(root)),
        }
    }

    fn times(&self, container: Node) -> Vec<Time> {
        elements(section(container, "Times"), "Time")
            .map(|time| Time::new(id_of(time), child_text(time, "Name")))
            .collect()
    }

    fn resources(&self, container: Node) -> Vec<Resource> {
        elements(section(container, "Resources"), "Resource")
            .map(|resource| {
                let kind = child(resource, "ResourceType")
                    .and_then(|t| t.attribute("Reference"))
                    .map(ResourceKind::from_tag)
                    .unwrap_or_else(|| ResourceKind::Other(String::new()));
                Resource::new(id_of(resource), child_text(resource, "Name"), kind)
            })
            .collect()
    }

    fn events(
        &self,
        container: Node,
        kinds: &HashMap<&str, &ResourceKind>,
    ) -> Result<Vec<Event>, LoadError> {
        elements(section(container, "Events"), "Event")
            .map(|event| self.event(event, kinds))
            .collect()
    }

    fn event(&self, node: Node, kinds: &HashMap<&str, &ResourceKind>) -> Result<Event, LoadError> {
        let id = id_of(node);

        let duration_node = child(node, "Duration")
            .ok_or_else(|| self.error(node, format!("event '{}' has no <Duration>", id)))?;
        let text = duration_node.text().unwrap_or("").trim();
        let duration: i64 = text.parse().map_err(|_| {
            self.error(duration_node, format!("invalid duration '{}'", text))
        })?;
        if duration <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                event: id.to_string(),
                duration,
            }
            .into());
        }
        let duration = u32::try_from(duration).map_err(|_| {
            self.error(duration_node, format!("duration {} is too large", duration))
        })?;

        let mut class_ref = None;
        let mut teacher_ref = None;
        for resource in elements(child(node, "Resources"), "Resource") {
            let Some(reference) = resource.attribute("Reference") else {
                continue;
            };
            let (role, slot) = match role_of(resource, reference, kinds) {
                Some(ResourceKind::Class) => ("Class", &mut class_ref),
                Some(ResourceKind::Teacher) => ("Teacher", &mut teacher_ref),
                _ => continue,
            };
            if slot.is_some() {
                return Err(self.error(
                    resource,
                    format!("event '{}' lists more than one {} resource", id, role),
                ));
            }
            *slot = Some(reference.trim());
        }

        let class_ref = class_ref
            .ok_or_else(|| self.error(node, format!("event '{}' has no Class resource", id)))?;
        let teacher_ref = teacher_ref
            .ok_or_else(|| self.error(node, format!("event '{}' has no Teacher resource", id)))?;

        Ok(Event::new(
            id,
            child_text(node, "Name"),
            duration,
            class_ref,
            teacher_ref,
        ))
    }
}

fn role_of(
    resource: Node,
    reference: &str,
    kinds: &HashMap<&str, &ResourceKind>,
) -> Option<ResourceKind> {
    let explicit = resource
        .attribute("Role")
        .or_else(|| child(resource, "Role").and_then(|r| r.text()))
        .or_else(|| child(resource, "ResourceType").and_then(|t| t.attribute("Reference")));
    match explicit {
        Some(tag) => Some(ResourceKind::from_tag(tag)),
        None => kinds.get(reference.trim()).map(|kind| (*kind).clone()),
    }
}

fn section<'a, 'input>(container: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    container.children().find(|n| n.has_tag_name(tag))
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn elements<'a, 'input>(
    parent: Option<Node<'a, 'input>>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent
        .into_iter()
        .flat_map(|p| p.children())
        .filter(move |n| n.has_tag_name(tag))
}

fn id_of<'a>(node: Node<'a, '_>) -> &'a str {
    node.attribute("Id").map(str::trim).unwrap_or("")
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> &'a str {
    child(node, tag)
        .and_then(|n| n.text())
        .map(str::trim)
        .unwrap_or("")
}
