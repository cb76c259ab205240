//! Remove a staged file by name

use crate::storage::{FsStorage, StorageError};

/// Errors that can occur deleting a staged file
#[derive(Debug, thiserror::Error)]
pub enum DeleteStagedFileError {
    #[error("File '{0}' not found")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

/// Handles the delete-staged-file command
#[tracing::instrument(skip(storage))]
pub fn handle(storage: &FsStorage, user_id: i64, filename: &str) -> Result<(), DeleteStagedFileError> {
    match storage.delete_staged(user_id, filename) {
        Ok(()) => {
            tracing::info!("Staged file deleted");
            Ok(())
        },
        Err(StorageError::NotFound(name)) => Err(DeleteStagedFileError::NotFound(name)),
        Err(StorageError::InvalidFilename(name)) => Err(DeleteStagedFileError::NotFound(name)),
        Err(e) => Err(DeleteStagedFileError::Storage(e)),
    }
}
