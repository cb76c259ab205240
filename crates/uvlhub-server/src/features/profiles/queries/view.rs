//! Researcher profile pages
//!
//! A profile view carries the profile fields plus a page of the user's
//! datasets, newest first. Profiles marked private are only visible to
//! their owner.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::api::response::PaginationMeta;
use crate::features::shared::pagination::{PaginationError, PaginationParams};

/// Errors that can occur viewing a profile
#[derive(Debug, thiserror::Error)]
pub enum ViewProfileError {
    #[error("{0}")]
    Pagination(#[from] PaginationError),

    #[error("User with id {0} not found")]
    NotFound(i64),

    #[error("User data is not public")]
    NotPublic,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProfileInfo {
    pub user_id: i64,
    pub name: String,
    pub surname: String,
    pub orcid: Option<String>,
    pub affiliation: Option<String>,
    pub public_data: bool,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProfileDataset {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub dataset_doi: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response for the view-profile and profile-summary queries
#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub profile: ProfileInfo,
    pub datasets: Vec<ProfileDataset>,
    pub total_datasets: i64,
    pub pagination: PaginationMeta,
}

/// Handles the view-profile query. `viewer` is the authenticated caller,
/// if any; a private profile is rejected for everyone but its owner.
#[tracing::instrument(skip(pool, params))]
pub async fn handle(
    pool: &PgPool,
    user_id: i64,
    viewer: Option<i64>,
    params: &PaginationParams,
) -> Result<ProfilePage, ViewProfileError> {
    let profile = load_profile(pool, user_id).await?;

    if !profile.public_data && viewer != Some(user_id) {
        return Err(ViewProfileError::NotPublic);
    }

    page_datasets(pool, profile, params).await
}

/// Handles the profile-summary query: the caller's own profile, private
/// or not.
#[tracing::instrument(skip(pool, params))]
pub async fn summary(
    pool: &PgPool,
    user_id: i64,
    params: &PaginationParams,
) -> Result<ProfilePage, ViewProfileError> {
    let profile = load_profile(pool, user_id).await?;
    page_datasets(pool, profile, params).await
}

async fn load_profile(pool: &PgPool, user_id: i64) -> Result<ProfileInfo, ViewProfileError> {
    sqlx::query_as::<_, ProfileInfo>(
        r#"
        SELECT user_id, name, surname, orcid, affiliation, public_data
        FROM user_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ViewProfileError::NotFound(user_id))
}

async fn page_datasets(
    pool: &PgPool,
    profile: ProfileInfo,
    params: &PaginationParams,
) -> Result<ProfilePage, ViewProfileError> {
    let (page, per_page) = params.resolve()?;

    let total_datasets = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM data_sets WHERE user_id = $1",
    )
    .bind(profile.user_id)
    .fetch_one(pool)
    .await?;

    let datasets = sqlx::query_as::<_, ProfileDataset>(
        r#"
        SELECT d.id, m.title, m.description, m.dataset_doi, d.created_at
        FROM data_sets d
        JOIN ds_meta_data m ON m.id = d.ds_meta_data_id
        WHERE d.user_id = $1
        ORDER BY d.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(profile.user_id)
    .bind(per_page)
    .bind(PaginationParams::offset(page, per_page))
    .fetch_all(pool)
    .await?;

    Ok(ProfilePage {
        profile,
        datasets,
        total_datasets,
        pagination: PaginationMeta::new(page, per_page, total_datasets),
    })
}
