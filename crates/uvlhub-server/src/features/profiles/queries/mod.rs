pub mod view;

pub use view::ViewProfileError;
