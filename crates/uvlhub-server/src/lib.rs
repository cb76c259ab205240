//! UVLHub Server Library
//!
//! HTTP server for a feature-model dataset hub.
//!
//! # Overview
//!
//! The server exposes a REST API for managing UVL feature-model datasets:
//!
//! - **Datasets**: upload, list, resolve by DOI, and package as ZIP archives
//! - **Staging**: multipart upload of UVL files before dataset submission
//! - **Hubfiles**: download/view individual stored files with conversion to
//!   DIMACS, SPLOT, and Glencoe formats
//! - **Ratings**: per-user dataset ratings
//! - **Profiles**: public researcher profiles with paginated dataset listings
//! - **Fakenodo**: a Zenodo-style archival mirror, both the outbound client
//!   and an in-process simulation of its API
//!
//! # Architecture
//!
//! Feature slices under [`features`] each carry their own `commands/`
//! (writes), `queries/` (reads), and `routes.rs`. Writes run in database
//! transactions; reads never mutate state, with one deliberate exception:
//! download and view handlers append deduplicated activity records.
//!
//! Request identity comes from an `x-user-id` header installed by a fronting
//! auth layer. The analytics cookies are anonymous browser identifiers, not
//! authentication.

pub mod api;
pub mod config;
pub mod features;
pub mod middleware;
pub mod packaging;
pub mod storage;

pub use api::response::{ApiResponse, AppError, ErrorResponse, PaginationMeta};
