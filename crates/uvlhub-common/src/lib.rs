//! UVLHub Common Library
//!
//! Shared types, utilities, and error handling for the UVLHub workspace:
//!
//! - **Error Handling**: the workspace-wide [`HubError`] and [`Result`] alias
//! - **Checksums**: MD5 content hashes for stored files and SHA-256 manifest
//!   checksums for the archival mirror
//! - **Logging**: tracing initialization with console/file output
//! - **Types**: shared domain types (publication types, size formatting)

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{HubError, Result};
