//! Dialect definition fixtures and on-disk project builders.

use std::io::Write;
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Standard dialect: non-strict `th`.
pub const STANDARD_DIALECT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<dialect xmlns="http://www.thymeleaf.org/extras/dialect"
         prefix="th" namespace-uri="http://www.thymeleaf.org">
  <attribute-processor name="text">
    <documentation see-also="utext">Sets the element body, escaped.</documentation>
  </attribute-processor>
  <attribute-processor name="template"/>
  <attribute-processor name="href"/>
  <attribute-processor name="utext">
    <restrictions attributes="-th:text"/>
  </attribute-processor>
  <attribute-processor name="field">
    <restrictions tags="input select textarea"/>
  </attribute-processor>
  <attribute-processor name="readonly">
    <restrictions attributes="-disabled"/>
  </attribute-processor>
  <element-processor name="block">
    <documentation>Synthetic block element.</documentation>
  </element-processor>
  <expression-object-method name="strings.isEmpty"/>
  <expression-object-method name="strings.toUpperCase"/>
</dialect>"#;

/// Strict dialect `sec` bound to `http://example/sec`.
pub const STRICT_DIALECT: &str = r#"<dialect xmlns="http://www.thymeleaf.org/extras/dialect"
         prefix="sec" namespace-uri="http://example/sec" namespace-strict="true">
  <attribute-processor name="authorize"/>
</dialect>"#;

/// Dialect with an expression object whose helpers are synthesized.
pub const OBJECT_DIALECT: &str = r#"<dialect xmlns="http://www.thymeleaf.org/extras/dialect"
         prefix="app" namespace-uri="http://example/app">
  <expression-object name="user" class="org.example.UserHelper"/>
</dialect>"#;

/// A project dialect `ext` with one attribute processor named `name`.
pub fn project_dialect(attribute: &str) -> String {
    format!(
        r#"<dialect xmlns="http://www.thymeleaf.org/extras/dialect" prefix="ext" namespace-uri="http://example/ext">
  <attribute-processor name="{attribute}"/>
</dialect>"#
    )
}

/// A project dialect `ext` with several attribute processors.
pub fn project_dialect_with(attributes: &[String]) -> String {
    let items: String = attributes
        .iter()
        .map(|a| format!("  <attribute-processor name=\"{a}\"/>\n"))
        .collect();
    format!(
        r#"<dialect xmlns="http://www.thymeleaf.org/extras/dialect" prefix="ext" namespace-uri="http://example/ext">
{items}</dialect>"#
    )
}

/// Unrelated XML that happens to live next to dialect files.
pub const NOT_A_DIALECT: &str = r#"<beans xmlns="http://www.springframework.org/schema/beans"/>"#;

/// Write a file, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Build a jar-like archive with the given entries.
pub fn write_archive(root: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (entry, content) in entries {
        zip.start_file(*entry, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path
}
