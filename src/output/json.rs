//! JSON export of event batches.
//!
//! Serialization and file writing are split so callers can print to
//! stdout or write to disk with the same rendering.

use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::parser::event::Event;
use crate::utils::error::OutputError;

/// Render a batch of events as pretty-printed JSON.
///
/// **Public** - main entry point for JSON export
pub fn events_to_json(events: &[Event]) -> Result<String, OutputError> {
    serde_json::to_string_pretty(events).map_err(OutputError::SerializationFailed)
}

/// Write rendered output to a file.
///
/// **Public** - shared by every export format
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path, or path is a directory
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_output(content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing output to: {}", output_path.display());
    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("Output written successfully ({} bytes)", content.len());
    Ok(())
}

/// Validate that the output path is usable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> Event {
        value.as_object().expect("test event must be an object").clone()
    }

    #[test]
    fn test_events_to_json_preserves_structure() {
        let events = vec![event(json!({"host": "a", "nested": {"k": [1, 2]}}))];

        let rendered = events_to_json(&events).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed[0]["nested"]["k"][1], json!(2));
    }

    #[test]
    fn test_events_to_json_empty_batch() {
        assert_eq!(events_to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_write_and_read_back() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();

        write_output("{\"ok\": true}", temp_file.path()).unwrap();

        let read = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(read, "{\"ok\": true}");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/out.json");

        write_output("[]", &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_write_rejects_empty_path() {
        assert!(write_output("x", Path::new("")).is_err());
    }

    #[test]
    fn test_write_rejects_directory() {
        let temp_dir = tempfile::tempdir().unwrap();

        assert!(write_output("x", temp_dir.path()).is_err());
    }
}
