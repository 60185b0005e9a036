//! File-backed storage - one JSON file per record

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{BundleStorage, SessionRecord};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

#[async_trait]
impl BundleStorage for FileStorage {
    async fn read(&self, name: &str) -> Result<Option<SessionRecord>> {
        let bytes = match tokio::fs::read(self.path_for(name)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn write(&self, name: &str, record: &SessionRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Readers only ever see a complete file
        let path = self.path_for(name);
        let tmp = self.path_for(&format!("{}.tmp", name));
        let json = serde_json::to_vec(record)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!("[FileStorage] Wrote {:?}", path);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabsError;
    use crate::storage::RecordValue;

    #[tokio::test]
    async fn test_missing_record_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(storage.read("saved_tabs.json").await.unwrap().is_none());
        tokio_test::assert_ok!(storage.delete("saved_tabs.json").await);
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        let mut record = SessionRecord::new();
        record.put("TAB_TITLE_0", RecordValue::Text("Example".to_string()));

        storage.write("saved_tabs.json", &record).await.unwrap();
        assert_eq!(storage.read("saved_tabs.json").await.unwrap(), Some(record));
        assert!(!dir.path().join("nested/saved_tabs.json.tmp").exists());

        storage.delete("saved_tabs.json").await.unwrap();
        assert!(storage.read("saved_tabs.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("saved_tabs.json"), b"{ not json").unwrap();
        let storage = FileStorage::new(dir.path());

        let result = storage.read("saved_tabs.json").await;
        assert!(matches!(result, Err(TabsError::Json(_))));
    }
}
