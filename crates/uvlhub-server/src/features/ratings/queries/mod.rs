pub mod list;

pub use list::ListRatingsError;
