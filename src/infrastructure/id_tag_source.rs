//! Filesystem-backed `IdTagSource` (spec.md §6 "getIdTags(file) → string[]").

use async_trait::async_trait;

use crate::domain::ports::{CollaboratorError, CollaboratorResult, IdTagSource};

/// Reads one id-tag per non-empty, non-comment line of a text file.
pub struct FileIdTagSource {
    root: std::path::PathBuf,
}

impl FileIdTagSource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl IdTagSource for FileIdTagSource {
    async fn get_id_tags(&self, file: &str) -> CollaboratorResult<Vec<String>> {
        let full_path = self.root.join(file);
        let text = tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| CollaboratorError::IdTagSource(format!("{}: {}", full_path.display(), e)))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_lines_and_comments_are_skipped() {
        let dir = std::env::temp_dir().join(format!("idtags-test-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let file_path = dir.join("tags.txt");
        tokio::fs::write(&file_path, "TAG1\n\n# comment\nTAG2\n").await.unwrap();

        let source = FileIdTagSource::new(&dir);
        let tags = source.get_id_tags("tags.txt").await.unwrap();
        assert_eq!(tags, vec!["TAG1".to_string(), "TAG2".to_string()]);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
