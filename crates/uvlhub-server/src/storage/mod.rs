//! Filesystem storage for uploaded files
//!
//! Stored files live under `<uploads>/user_<uid>/dataset_<did>/<name>`; paths
//! are always derived from those three values and never persisted. Files
//! uploaded before dataset submission sit in a per-user staging folder under
//! the temp directory until the dataset is created.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::StorageConfig;

/// Errors from filesystem storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filename '{0}'")]
    InvalidFilename(String),

    #[error("File '{0}' not found")]
    NotFound(String),
}

/// Filesystem storage rooted at the configured uploads and temp directories
#[derive(Debug, Clone)]
pub struct FsStorage {
    uploads_dir: PathBuf,
    temp_dir: PathBuf,
}

impl FsStorage {
    /// Create the storage backend, ensuring both root directories exist.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let uploads_dir = PathBuf::from(&config.uploads_dir);
        let temp_dir = PathBuf::from(&config.temp_dir);
        std::fs::create_dir_all(&uploads_dir)?;
        std::fs::create_dir_all(&temp_dir)?;
        Ok(Self {
            uploads_dir,
            temp_dir,
        })
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Permanent directory for one dataset's files.
    pub fn dataset_dir(&self, user_id: i64, dataset_id: i64) -> PathBuf {
        self.uploads_dir
            .join(format!("user_{}", user_id))
            .join(format!("dataset_{}", dataset_id))
    }

    /// Path of a stored file inside a dataset directory.
    pub fn hubfile_path(&self, user_id: i64, dataset_id: i64, name: &str) -> PathBuf {
        self.dataset_dir(user_id, dataset_id).join(name)
    }

    /// Per-user staging folder for files awaiting dataset submission.
    pub fn staging_dir(&self, user_id: i64) -> PathBuf {
        self.temp_dir.join(format!("user_{}", user_id))
    }

    pub fn staged_path(&self, user_id: i64, name: &str) -> PathBuf {
        self.staging_dir(user_id).join(name)
    }

    /// Write an uploaded file into the caller's staging folder.
    ///
    /// Name collisions are resolved by appending ` (k)` before the extension
    /// with the smallest free `k`. Returns the name the file was stored under.
    pub fn stage_file(
        &self,
        user_id: i64,
        filename: &str,
        contents: &[u8],
    ) -> Result<String, StorageError> {
        validate_filename(filename)?;
        let dir = self.staging_dir(user_id);
        std::fs::create_dir_all(&dir)?;
        let final_name = resolve_collision(&dir, filename);
        std::fs::write(dir.join(&final_name), contents)?;
        Ok(final_name)
    }

    /// Remove a staged file by name.
    pub fn delete_staged(&self, user_id: i64, name: &str) -> Result<(), StorageError> {
        validate_filename(name)?;
        let path = self.staged_path(user_id, name);
        if !path.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    /// Move every staged file of a user into a dataset's permanent directory
    /// and remove the staging folder.
    pub fn promote_staged(&self, user_id: i64, dataset_id: i64) -> Result<(), StorageError> {
        let staging = self.staging_dir(user_id);
        let target = self.dataset_dir(user_id, dataset_id);
        std::fs::create_dir_all(&target)?;

        if staging.is_dir() {
            for entry in std::fs::read_dir(&staging)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    std::fs::rename(entry.path(), target.join(entry.file_name()))?;
                }
            }
            std::fs::remove_dir_all(&staging)?;
        }
        Ok(())
    }
}

fn validate_filename(name: &str) -> Result<(), StorageError> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(StorageError::InvalidFilename(name.to_string()));
    }
    Ok(())
}

fn resolve_collision(dir: &Path, filename: &str) -> String {
    if !dir.join(filename).exists() {
        return filename.to_string();
    }
    let (stem, ext) = match filename.rfind('.') {
        Some(pos) => (&filename[..pos], &filename[pos..]),
        None => (filename, ""),
    };
    let mut k = 1;
    loop {
        let candidate = format!("{} ({}){}", stem, k, ext);
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, FsStorage) {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            uploads_dir: dir.path().join("uploads").to_string_lossy().into_owned(),
            temp_dir: dir.path().join("temp").to_string_lossy().into_owned(),
            public_domain: "localhost:5000".to_string(),
        };
        let storage = FsStorage::new(&config).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_stage_file_resolves_collisions() {
        let (_guard, storage) = storage();
        assert_eq!(storage.stage_file(1, "model.uvl", b"a").unwrap(), "model.uvl");
        assert_eq!(storage.stage_file(1, "model.uvl", b"b").unwrap(), "model (1).uvl");
        assert_eq!(storage.stage_file(1, "model.uvl", b"c").unwrap(), "model (2).uvl");
    }

    #[test]
    fn test_rejects_path_traversal() {
        let (_guard, storage) = storage();
        assert!(matches!(
            storage.stage_file(1, "../evil.uvl", b"x"),
            Err(StorageError::InvalidFilename(_))
        ));
        assert!(matches!(
            storage.stage_file(1, "a/b.uvl", b"x"),
            Err(StorageError::InvalidFilename(_))
        ));
    }

    #[test]
    fn test_delete_staged_missing_file() {
        let (_guard, storage) = storage();
        assert!(matches!(
            storage.delete_staged(1, "nope.uvl"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_promote_staged_moves_files_and_clears_staging() {
        let (_guard, storage) = storage();
        storage.stage_file(7, "a.uvl", b"features\n    A\n").unwrap();
        storage.stage_file(7, "b.uvl", b"features\n    B\n").unwrap();

        storage.promote_staged(7, 3).unwrap();

        assert!(storage.hubfile_path(7, 3, "a.uvl").is_file());
        assert!(storage.hubfile_path(7, 3, "b.uvl").is_file());
        assert!(!storage.staging_dir(7).exists());
    }
}
