//! List all ratings for a dataset

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Errors that can occur listing ratings
#[derive(Debug, thiserror::Error)]
pub enum ListRatingsError {
    #[error("Dataset with id {0} not found")]
    DatasetNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One rating in a dataset's rating list
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RatingListItem {
    pub id: i64,
    pub user_id: i64,
    pub rate: i32,
    pub comment: Option<String>,
    pub rated_date: DateTime<Utc>,
}

/// Response for the list-ratings query
#[derive(Debug, Serialize)]
pub struct RatingListResponse {
    pub dataset_id: i64,
    pub ratings: Vec<RatingListItem>,
    pub average_rate: Option<f64>,
}

/// Handles the list-ratings query. Ratings come back newest first.
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &PgPool, dataset_id: i64) -> Result<RatingListResponse, ListRatingsError> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM data_sets WHERE id = $1")
        .bind(dataset_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(ListRatingsError::DatasetNotFound(dataset_id));
    }

    let ratings = sqlx::query_as::<_, RatingListItem>(
        r#"
        SELECT id, user_id, rate, comment, rated_date
        FROM rate_datasets
        WHERE dataset_id = $1
        ORDER BY rated_date DESC
        "#,
    )
    .bind(dataset_id)
    .fetch_all(pool)
    .await?;

    let average_rate = if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().map(|r| f64::from(r.rate)).sum::<f64>() / ratings.len() as f64)
    };

    Ok(RatingListResponse {
        dataset_id,
        ratings,
        average_rate,
    })
}
