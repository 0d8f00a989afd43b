//! Format detection.

use std::path::Path;

use ttbench_core::Instance;

use crate::{instance_name, InstanceLoader, LoadError, TextLoader, XmlLoader};

/// Instance file formats understood by [`AutoLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceFormat {
    Xml,
    Text,
}

impl InstanceFormat {
    /// Format implied by a file extension, if it is a known one.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("xml") {
            Some(InstanceFormat::Xml)
        } else if ext.eq_ignore_ascii_case("txt") {
            Some(InstanceFormat::Text)
        } else {
            None
        }
    }

    /// Guesses the format from the content: markup starts with `<`.
    pub fn sniff(input: &str) -> Self {
        let start = input.trim_start_matches('\u{feff}').trim_start();
        if start.starts_with('<') {
            InstanceFormat::Xml
        } else {
            InstanceFormat::Text
        }
    }
}

/// Dispatches to [`XmlLoader`] or [`TextLoader`].
///
/// Files go by extension (`.xml`, `.txt`); anything else, and every
/// [`load_str`](InstanceLoader::load_str) call, goes by content.
///
/// # Example
///
/// ```
/// use ttbench_loader::{AutoLoader, InstanceLoader};
///
/// let xml = r#"<Instance>
///   <Times><Time Id="T1"/></Times>
///   <Resources>
///     <Resource Id="C1"><ResourceType Reference="Class"/></Resource>
///     <Resource Id="P1"><ResourceType Reference="Teacher"/></Resource>
///   </Resources>
///   <Events>
///     <Event Id="E1"><Duration>1</Duration>
///       <Resources><Resource Reference="C1"/><Resource Reference="P1"/></Resources>
///     </Event>
///   </Events>
/// </Instance>"#;
///
/// let instance = AutoLoader::new().load_str("tiny", xml).unwrap();
/// assert_eq!(instance.event("E1").unwrap().teacher_ref, "P1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutoLoader {
    xml: XmlLoader,
    text: TextLoader,
}

impl AutoLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `xml` for markup input.
    pub fn with_xml_loader(mut self, xml: XmlLoader) -> Self {
        self.xml = xml;
        self
    }

    fn loader(&self, format: InstanceFormat) -> &dyn InstanceLoader {
        match format {
            InstanceFormat::Xml => &self.xml,
            InstanceFormat::Text => &self.text,
        }
    }
}

impl InstanceLoader for AutoLoader {
    fn load_str(&self, name: &str, input: &str) -> Result<Instance, LoadError> {
        self.loader(InstanceFormat::sniff(input)).load_str(name, input)
    }

    fn load(&self, path: &Path) -> Result<Instance, LoadError> {
        let input = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let format =
            InstanceFormat::from_path(path).unwrap_or_else(|| InstanceFormat::sniff(&input));
        self.loader(format).load_str(&instance_name(path), &input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Times:\nT1, Mon\nResources:\nR1, 1A, Class\nR2, Bob, Teacher\nEvents:\nE1, Art, 1, R1, R2\n";

    const XML: &str = r#"<Instance>
  <Times><Time Id="T1"/><Time Id="T2"/></Times>
  <Resources>
    <Resource Id="R1"><ResourceType Reference="Class"/></Resource>
    <Resource Id="R2"><ResourceType Reference="Teacher"/></Resource>
  </Resources>
  <Events>
    <Event Id="E1"><Duration>1</Duration>
      <Resources><Resource Reference="R1"/><Resource Reference="R2"/></Resources>
    </Event>
  </Events>
</Instance>
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            InstanceFormat::from_path(Path::new("BrazilInstance1.XML")),
            Some(InstanceFormat::Xml)
        );
        assert_eq!(
            InstanceFormat::from_path(Path::new("school.txt")),
            Some(InstanceFormat::Text)
        );
        assert_eq!(InstanceFormat::from_path(Path::new("school")), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(
            InstanceFormat::sniff("\n  <?xml version=\"1.0\"?>"),
            InstanceFormat::Xml
        );
        assert_eq!(InstanceFormat::sniff(TEXT), InstanceFormat::Text);
    }

    #[test]
    fn test_load_str_by_content() {
        let loader = AutoLoader::new();
        assert_eq!(loader.load_str("x", XML).unwrap().time_count(), 2);
        assert_eq!(loader.load_str("t", TEXT).unwrap().time_count(), 1);
    }

    #[test]
    fn test_load_by_extension_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let xml = dir.path().join("BrazilInstance1.xml");
        std::fs::write(&xml, XML).unwrap();
        let text = dir.path().join("school.txt");
        std::fs::write(&text, TEXT).unwrap();
        let bare = dir.path().join("archive");
        std::fs::write(&bare, XML).unwrap();

        let loader = AutoLoader::new();
        let brazil = loader.load(&xml).unwrap();
        assert_eq!(brazil.name(), "BrazilInstance1");
        assert_eq!(brazil.event("E1").unwrap().class_ref, "R1");
        assert_eq!(loader.load(&text).unwrap().name(), "school");
        assert_eq!(loader.load(&bare).unwrap().time_count(), 2);
    }

    #[test]
    fn test_extension_wins_over_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mislabelled.xml");
        std::fs::write(&path, TEXT).unwrap();

        let err = AutoLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
