//! Stage an uploaded UVL file
//!
//! Files are parsed before they are accepted; a file that is not valid UVL
//! never reaches the staging folder. Name collisions within the folder are
//! resolved by the storage layer.

use crate::features::shared::validation::is_uvl_filename;
use crate::storage::{FsStorage, StorageError};
use uvlhub_fm::{parser, UvlError};

/// Errors that can occur staging a file
#[derive(Debug, thiserror::Error)]
pub enum StageFileError {
    #[error("Only .uvl files are accepted")]
    NotUvl,

    #[error("File is not valid UTF-8")]
    NotUtf8,

    #[error("Invalid UVL: {0}")]
    InvalidUvl(#[from] UvlError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Handles the stage-file command. Returns the name the file was stored
/// under, which differs from the requested one when a collision was resolved.
#[tracing::instrument(skip(storage, contents), fields(size = contents.len()))]
pub fn handle(
    storage: &FsStorage,
    user_id: i64,
    filename: &str,
    contents: &[u8],
) -> Result<String, StageFileError> {
    if !is_uvl_filename(filename) {
        return Err(StageFileError::NotUvl);
    }

    let source = std::str::from_utf8(contents).map_err(|_| StageFileError::NotUtf8)?;
    parser::parse(source)?;

    let stored_name = storage.stage_file(user_id, filename, contents)?;

    tracing::info!(stored_name = %stored_name, "UVL file staged");

    Ok(stored_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

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
    fn test_valid_uvl_is_staged() {
        let (_guard, storage) = storage();
        let name = handle(&storage, 1, "model.uvl", b"features\n    A\n").unwrap();
        assert_eq!(name, "model.uvl");
        assert!(storage.staged_path(1, "model.uvl").is_file());
    }

    #[test]
    fn test_rejects_non_uvl_extension() {
        let (_guard, storage) = storage();
        assert!(matches!(
            handle(&storage, 1, "model.xml", b"features\n    A\n"),
            Err(StageFileError::NotUvl)
        ));
    }

    #[test]
    fn test_rejects_unparseable_content() {
        let (_guard, storage) = storage();
        assert!(matches!(
            handle(&storage, 1, "model.uvl", b"not a model"),
            Err(StageFileError::InvalidUvl(_))
        ));
        assert!(!storage.staged_path(1, "model.uvl").exists());
    }
}
