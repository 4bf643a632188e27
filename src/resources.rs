use log::warn;
use std::path::{Path, PathBuf};

/// RAII guard for intermediate artifacts (extracted WAVs, censored audio)
/// that deletes the file on drop unless ownership is taken.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl TempFile {
    /// Wrap an existing path
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cleanup_on_drop: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Take ownership of the path, disabling cleanup
    pub fn persist(mut self) -> PathBuf {
        self.cleanup_on_drop = false;
        self.path.clone()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.cleanup_on_drop && self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Failed to clean up temporary file {:?}: {}", self.path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_temp_file_cleanup_on_drop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("artifact.wav");

        File::create(&file_path).unwrap();

        {
            let _temp_file = TempFile::new(file_path.clone());
            assert!(file_path.exists());
        }

        assert!(!file_path.exists());
    }

    #[test]
    fn test_persist_disables_cleanup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("artifact.wav");

        File::create(&file_path).unwrap();

        let temp_file = TempFile::new(file_path.clone());
        let kept = temp_file.persist();

        assert_eq!(kept, file_path);
        assert!(file_path.exists());
    }
}
