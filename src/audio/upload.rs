use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An uploaded recording parked on local disk for the duration of a request.
///
/// The file is removed exactly once: either through [`TempUpload::release`]
/// or, on any other exit path, when the guard is dropped.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    released: bool,
}

impl TempUpload {
    /// Write `bytes` to a fresh file under `dir`, creating `dir` if needed.
    pub async fn store(dir: &Path, bytes: &[u8]) -> io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(format!("upload-{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored upload: {} ({} bytes)", path.display(), bytes.len());

        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// Remove the file now and report the outcome.
    pub fn release(mut self) -> io::Result<()> {
        self.released = true;
        remove(&self.path)
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = remove(&self.path) {
            warn!("Failed to remove upload {}: {}", self.path.display(), e);
        }
    }
}

fn remove(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed upload: {}", path.display());
            Ok(())
        }
        // Already gone counts as released
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_and_read_back() {
        let dir = TempDir::new().unwrap();
        let upload = TempUpload::store(dir.path(), b"webm bytes").await.unwrap();

        assert!(upload.path().exists());
        assert_eq!(upload.read().await.unwrap(), b"webm bytes");
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = TempDir::new().unwrap();
        let upload = TempUpload::store(dir.path(), b"abc").await.unwrap();
        let path = upload.path().to_path_buf();

        drop(upload);

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_removes_file_once() {
        let dir = TempDir::new().unwrap();
        let upload = TempUpload::store(dir.path(), b"abc").await.unwrap();
        let path = upload.path().to_path_buf();

        upload.release().unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_removed_on_early_error_return() {
        async fn failing_handler(dir: &Path) -> Result<(), &'static str> {
            let _upload = TempUpload::store(dir, b"abc").await.map_err(|_| "io")?;
            Err("upstream parse failed")
        }

        let dir = TempDir::new().unwrap();
        assert!(failing_handler(dir.path()).await.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_store_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("uploads").join("nested");

        let upload = TempUpload::store(&nested, b"x").await.unwrap();

        assert!(upload.path().starts_with(&nested));
    }
}
