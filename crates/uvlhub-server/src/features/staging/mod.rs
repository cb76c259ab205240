pub mod commands;
pub mod routes;

pub use commands::{DeleteStagedFileError, StageFileError};
pub use routes::staging_routes;
