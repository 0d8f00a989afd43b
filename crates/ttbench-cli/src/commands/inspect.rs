//! Inspect command - instance sizes and model dimensions

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use ttbench::{Instance, ModelBuilder, ModelStats, ResourceKind};

use super::load_instance;

#[derive(Parser, Debug)]
pub struct InspectCmd {
    /// Instance file
    pub instance: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct InstanceInfo {
    name: String,
    times: usize,
    classes: usize,
    teachers: usize,
    other_resources: usize,
    events: usize,
    model: ModelStats,
}

impl InstanceInfo {
    fn collect(instance: &Instance, model: ModelStats) -> Self {
        let classes = instance.resources_of_kind(&ResourceKind::Class).count();
        let teachers = instance.resources_of_kind(&ResourceKind::Teacher).count();
        Self {
            name: instance.name().to_string(),
            times: instance.time_count(),
            classes,
            teachers,
            other_resources: instance.resource_count() - classes - teachers,
            events: instance.event_count(),
            model,
        }
    }
}

impl InspectCmd {
    pub fn execute(&self, out: &mut impl Write) -> Result<()> {
        let instance = load_instance(&self.instance)?;
        let model = ModelBuilder::new(&instance)
            .build()
            .with_context(|| format!("Failed to build model for {}", instance.name()))?;
        let info = InstanceInfo::collect(&instance, model.stats());

        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
            return Ok(());
        }

        writeln!(out, "Instance:    {}", info.name)?;
        writeln!(out, "Times:       {}", info.times)?;
        writeln!(out, "Classes:     {}", info.classes)?;
        writeln!(out, "Teachers:    {}", info.teachers)?;
        if info.other_resources > 0 {
            writeln!(out, "Other:       {}", info.other_resources)?;
        }
        writeln!(out, "Events:      {}", info.events)?;
        writeln!(out, "Variables:   {}", info.model.variables)?;
        writeln!(out, "Constraints: {}", info.model.constraints)?;
        writeln!(out, "Nonzeros:    {}", info.model.nonzeros)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttbench_test::{SAMPLE_TEXT, SAMPLE_XML};

    fn sample_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("school.txt");
        std::fs::write(&path, SAMPLE_TEXT).unwrap();
        path
    }

    #[test]
    fn test_inspect_table() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = InspectCmd {
            instance: sample_file(&dir),
            json: false,
        };
        let mut out = Vec::new();
        cmd.execute(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Instance:    school"));
        assert!(text.contains("Times:       2"));
        assert!(text.contains("Classes:     2"));
        assert!(text.contains("Teachers:    1"));
        assert!(text.contains("Events:      2"));
        assert!(text.contains("Variables:   4"));
        assert!(text.contains("Constraints: 2"));
        assert!(text.contains("Nonzeros:    4"));
        assert!(!text.contains("Other:"));
    }

    #[test]
    fn test_inspect_json() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = InspectCmd {
            instance: sample_file(&dir),
            json: true,
        };
        let mut out = Vec::new();
        cmd.execute(&mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["name"], "school");
        assert_eq!(value["model"]["variables"], 4);
    }

    #[test]
    fn test_inspect_xml_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BrazilInstance1.xml");
        std::fs::write(&path, SAMPLE_XML).unwrap();

        let cmd = InspectCmd {
            instance: path,
            json: false,
        };
        let mut out = Vec::new();
        cmd.execute(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Instance:    BrazilInstance1"));
        assert!(text.contains("Classes:     2"));
        assert!(text.contains("Teachers:    1"));
        assert!(text.contains("Variables:   4"));
    }
}
