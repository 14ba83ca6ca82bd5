//! Document Export
//!
//! Normalized HTML for email and other sinks, plus the structured JSON tree.
//! Writers drop `content.html` / `content.json` into an export directory.

pub mod html;

pub use html::{export_email_html, export_plain_html, normalize_html, ExportOptions};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::engine::DocumentController;
use crate::error::{EditorError, EditorResult};

pub const HTML_FILE_NAME: &str = "content.html";
pub const JSON_FILE_NAME: &str = "content.json";

/// Output format for exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Html,
    Json,
}

/// Pretty-printed document tree (2-space indent)
pub fn to_pretty_json(doc: &dyn DocumentController) -> EditorResult<String> {
    Ok(serde_json::to_string_pretty(&doc.json())?)
}

/// Render a document in the given format
pub fn render(doc: &dyn DocumentController, format: ExportFormat) -> EditorResult<String> {
    match format {
        ExportFormat::Html => Ok(export_email_html(doc)),
        ExportFormat::Json => to_pretty_json(doc),
    }
}

/// Write `content.html` (email preset) into `dir`
pub fn write_html(doc: &dyn DocumentController, dir: &Path) -> EditorResult<PathBuf> {
    write_export(dir, HTML_FILE_NAME, &render(doc, ExportFormat::Html)?)
}

/// Write `content.json` into `dir`
pub fn write_json(doc: &dyn DocumentController, dir: &Path) -> EditorResult<PathBuf> {
    write_export(dir, JSON_FILE_NAME, &render(doc, ExportFormat::Json)?)
}

fn write_export(dir: &Path, file_name: &str, contents: &str) -> EditorResult<PathBuf> {
    if dir.exists() && !dir.is_dir() {
        return Err(EditorError::Export(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, contents)?;
    info!("💾 Exported {} ({} bytes)", path.display(), contents.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Command, MemoryDocument};
    use tempfile::tempdir;

    #[test]
    fn test_write_html_uses_email_preset() {
        let dir = tempdir().unwrap();
        let doc = MemoryDocument::from_text("first\nsecond");
        let path = write_html(&doc, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), HTML_FILE_NAME);
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "<p>first</p>\n<p>second</p>"
        );
    }

    #[test]
    fn test_write_json_is_pretty() {
        let dir = tempdir().unwrap();
        let mut doc = MemoryDocument::from_text("hi");
        doc.run(&[Command::ToggleBlockquote]).unwrap();
        let path = write_json(&doc, &dir.path().join("nested")).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert!(written.starts_with("{\n  \"type\": \"doc\""));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["content"][0]["type"], "blockquote");
    }

    #[test]
    fn test_export_into_file_path_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, "x").unwrap();
        let doc = MemoryDocument::new();
        assert!(matches!(
            write_html(&doc, &file),
            Err(EditorError::Export(_))
        ));
    }
}
