pub mod create;
pub mod synchronize;

pub use create::{
    AuthorInput, CreateDatasetCommand, CreateDatasetError, CreateDatasetResponse,
    FeatureModelInput,
};
pub use synchronize::SynchronizeDatasetError;
