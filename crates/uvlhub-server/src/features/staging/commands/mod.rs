pub mod delete;
pub mod upload;

pub use delete::DeleteStagedFileError;
pub use upload::StageFileError;
