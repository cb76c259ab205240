pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::EditProfileError;
pub use queries::ViewProfileError;
pub use routes::profile_routes;
