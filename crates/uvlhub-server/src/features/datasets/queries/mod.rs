pub mod doi;
pub mod download;
pub mod download_all;
pub mod list;
pub mod unsynchronized;

pub use doi::{DatasetDetail, HubfileInfo, ResolveDoiError, ResolvedDoi};
pub use download::DownloadDatasetError;
pub use download_all::DownloadAllError;
pub use list::{DatasetListItem, ListDatasetsError, ListDatasetsResponse};
pub use unsynchronized::UnsynchronizedDatasetError;
