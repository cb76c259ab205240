//! Feature modules implementing the UVLHub API
//!
//! Each feature is a vertical slice with its own commands (writes), queries
//! (reads), and routes:
//!
//! - **datasets**: dataset submission, listing, DOI resolution, ZIP downloads
//! - **staging**: pre-submission UVL file uploads into per-user temp folders
//! - **hubfiles**: individual stored-file download/view and selected-file ZIPs
//! - **ratings**: per-user dataset ratings
//! - **profiles**: researcher profiles with paginated dataset listings
//! - **fakenodo**: the archival-mirror client and its API simulation

pub mod datasets;
pub mod fakenodo;
pub mod hubfiles;
pub mod profiles;
pub mod ratings;
pub mod shared;
pub mod staging;

use axum::Router;
use fakenodo::DepositionClient;

use crate::storage::FsStorage;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// Filesystem storage for uploaded files
    pub storage: FsStorage,
    /// Client for the archival mirror
    pub fakenodo: DepositionClient,
    /// Whether datasets are mirrored after creation
    pub mirror_enabled: bool,
}

/// Creates the main router with all feature routes mounted
///
/// Dataset, staging, and hubfile routes need the full [`FeatureState`];
/// ratings, profiles, and the mirror simulation only touch the database.
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .merge(datasets::dataset_routes().with_state(state.clone()))
        .merge(staging::staging_routes().with_state(state.clone()))
        .merge(hubfiles::hubfile_routes().with_state(state.clone()))
        .merge(ratings::rating_routes().with_state(state.db.clone()))
        .merge(profiles::profile_routes().with_state(state.db.clone()))
        .nest("/fakenodo/api", fakenodo::fakenodo_routes().with_state(state.db.clone()))
}
