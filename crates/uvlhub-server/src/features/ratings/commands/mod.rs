pub mod create;
pub mod delete;
pub mod edit;

pub use create::CreateRatingError;
pub use delete::DeleteRatingError;
pub use edit::EditRatingError;
