pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    CreateDatasetCommand, CreateDatasetError, CreateDatasetResponse, SynchronizeDatasetError,
};

pub use queries::{
    DatasetDetail, DatasetListItem, DownloadDatasetError, HubfileInfo, ListDatasetsError,
    ResolveDoiError,
};

pub use routes::dataset_routes;
