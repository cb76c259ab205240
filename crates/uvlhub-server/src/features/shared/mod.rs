//! Shared helpers used across feature slices

pub mod cookies;
pub mod identity;
pub mod pagination;
pub mod validation;
