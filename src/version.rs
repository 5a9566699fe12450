use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    colors::Palette,
    error::read_json,
    segments::{Context, RenderedSegment, StatusSegment},
};

const MANIFEST_FILE: &str = "package.json";

#[derive(Deserialize)]
struct Manifest {
    #[serde(default)]
    version: Option<Value>,
}

fn read_version(dir: &Path) -> Option<String> {
    let path = dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return None;
    }
    let manifest: Manifest = read_json(&path)
        .map_err(|e| tracing::debug!(error = %e, "ignoring manifest"))
        .ok()?;
    match manifest.version? {
        Value::String(version) if !version.is_empty() => Some(version),
        Value::Number(version) if version.as_f64() != Some(0.0) => Some(version.to_string()),
        _ => None,
    }
}

/// Version from the workspace's package manifest.
pub struct VersionSegment {
    version: String,
}

impl VersionSegment {
    pub fn new(context: &Context) -> Option<Self> {
        Some(VersionSegment {
            version: read_version(&context.path)?,
        })
    }
}

impl StatusSegment for VersionSegment {
    fn render(&self, palette: &Palette) -> RenderedSegment {
        RenderedSegment::new(palette.paint(palette.green, format!("v{}", self.version)))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::{
        colors::Palette,
        segments::{Context, StatusSegment},
    };

    use super::VersionSegment;

    fn segment_for(manifest: Option<&str>) -> Option<VersionSegment> {
        let dir = TempDir::new().unwrap();
        if let Some(manifest) = manifest {
            std::fs::write(dir.path().join("package.json"), manifest).unwrap();
        }
        VersionSegment::new(&Context::for_test(dir.path()))
    }

    #[test]
    fn renders_version() {
        let segment = segment_for(Some(r#"{"name": "app", "version": "1.4.0"}"#)).unwrap();
        assert_eq!(
            segment.render(&Palette::DEFAULT).text,
            "\x1b[32mv1.4.0\x1b[0m"
        );
    }

    #[test]
    fn missing_manifest() {
        assert!(segment_for(None).is_none());
    }

    #[test]
    fn manifest_without_version() {
        assert!(segment_for(Some(r#"{"name": "app"}"#)).is_none());
        assert!(segment_for(Some(r#"{"version": ""}"#)).is_none());
        assert!(segment_for(Some(r#"{"version": 0}"#)).is_none());
        assert!(segment_for(Some(r#"{"version": true}"#)).is_none());
    }

    #[test]
    fn numeric_version() {
        let segment = segment_for(Some(r#"{"version": 3}"#)).unwrap();
        assert_eq!(segment.render(&Palette::DEFAULT).text, "\x1b[32mv3\x1b[0m");
        let segment = segment_for(Some(r#"{"version": 1.5}"#)).unwrap();
        assert_eq!(segment.render(&Palette::DEFAULT).text, "\x1b[32mv1.5\x1b[0m");
    }

    #[test]
    fn corrupt_manifest() {
        assert!(segment_for(Some("{")).is_none());
        assert!(segment_for(Some("[1, 2]")).is_none());
    }
}
