pub mod edit;

pub use edit::EditProfileError;
