pub mod queries;
pub mod routes;

pub use queries::{DownloadHubfileError, DownloadSelectedError, ViewHubfileError};
pub use routes::hubfile_routes;
