use crate::prelude::{ReliefError, ReliefResult};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Where raw detection batches come from.
pub trait DetectionSource: Send + Sync {
    fn fetch(&self) -> ReliefResult<String>;
}

/// Batch stored as a delimited text file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DetectionSource for FileSource {
    fn fetch(&self) -> ReliefResult<String> {
        fs::read_to_string(&self.path).map_err(|err| {
            ReliefError::IngestionFailure(format!("reading {}: {}", self.path.display(), err))
        })
    }
}

/// Batch already held in memory.
#[derive(Debug, Clone)]
pub struct TextSource(pub String);

impl DetectionSource for TextSource {
    fn fetch(&self) -> ReliefResult<String> {
        Ok(self.0.clone())
    }
}

/// Runs `source.fetch()` on the blocking pool so the caller's task is never held up by I/O.
pub async fn fetch_detached(source: Arc<dyn DetectionSource>) -> ReliefResult<String> {
    tokio::task::spawn_blocking(move || source.fetch())
        .await
        .map_err(|err| ReliefError::IngestionFailure(format!("fetch task aborted: {}", err)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn file_source_reads_contents() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"h\nC1,1,1.0,1.0,1.0\n").unwrap();
        let source = FileSource::new(temp.path());
        assert!(source.fetch().unwrap().contains("C1"));
    }

    #[test]
    fn missing_file_is_an_ingestion_failure() {
        let source = FileSource::new("/nonexistent/detections.csv");
        assert!(matches!(
            source.fetch(),
            Err(ReliefError::IngestionFailure(_))
        ));
    }

    #[tokio::test]
    async fn detached_fetch_returns_source_text() {
        let source: Arc<dyn DetectionSource> = Arc::new(TextSource("h\nC1".into()));
        assert_eq!(fetch_detached(source).await.unwrap(), "h\nC1");
    }
}
