//! Archival mirror (Fakenodo)
//!
//! Two halves: the outbound [`client::DepositionClient`] the dataset slice
//! uses to mirror published datasets, and the in-process simulation of the
//! mirror's HTTP API backed by the `depositions` table.

pub mod client;
pub mod routes;

pub use client::{Creator, DepositionClient, DepositionMetadata, MirrorError};
pub use routes::fakenodo_routes;
