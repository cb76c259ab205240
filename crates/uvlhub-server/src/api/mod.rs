//! API response envelope and shared HTTP error type

pub mod response;
