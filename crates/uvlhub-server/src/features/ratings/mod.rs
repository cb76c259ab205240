pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{CreateRatingError, DeleteRatingError, EditRatingError};
pub use queries::ListRatingsError;
pub use routes::rating_routes;
