//! Filesystem-backed `TemplateSource` (spec.md §6 "getTemplate(path) → template").

use async_trait::async_trait;

use crate::domain::ports::{CollaboratorError, CollaboratorResult, TemplateSource};
use crate::domain::template::StationTemplate;

/// Reads a station template as a JSON file from disk, relative to a configured root.
pub struct FilesystemTemplateSource {
    root: std::path::PathBuf,
}

impl FilesystemTemplateSource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateSource for FilesystemTemplateSource {
    async fn get_template(&self, path: &str) -> CollaboratorResult<StationTemplate> {
        let full_path = self.root.join(path);
        let text = tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| CollaboratorError::TemplateLoad(format!("{}: {}", full_path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| CollaboratorError::TemplateLoad(format!("{}: {}", full_path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reports_template_load_error() {
        let source = FilesystemTemplateSource::new("/nonexistent-root");
        let err = source.get_template("cp.json").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::TemplateLoad(_)));
    }
}
