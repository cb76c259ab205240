//! Rate a dataset
//!
//! A user holds at most one rating per dataset. Rating an already-rated
//! dataset overwrites the previous score and comment rather than adding a
//! second row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::validation::{validate_rate, RateValidationError};

/// Command to create or replace a rating
#[derive(Debug, Deserialize)]
pub struct CreateRatingCommand {
    pub rate: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Errors that can occur creating a rating
#[derive(Debug, thiserror::Error)]
pub enum CreateRatingError {
    #[error("{0}")]
    Validation(#[from] RateValidationError),

    #[error("Dataset with id {0} not found")]
    DatasetNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Response for the create-rating command
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RatingResponse {
    pub id: i64,
    pub user_id: i64,
    pub dataset_id: i64,
    pub rate: i32,
    pub comment: Option<String>,
    pub rated_date: DateTime<Utc>,
}

/// Handles the create-rating command
#[tracing::instrument(skip(pool, command), fields(rate = command.rate))]
pub async fn handle(
    pool: &PgPool,
    user_id: i64,
    dataset_id: i64,
    command: CreateRatingCommand,
) -> Result<RatingResponse, CreateRatingError> {
    validate_rate(command.rate)?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM data_sets WHERE id = $1")
        .bind(dataset_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(CreateRatingError::DatasetNotFound(dataset_id));
    }

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM rate_datasets WHERE user_id = $1 AND dataset_id = $2",
    )
    .bind(user_id)
    .bind(dataset_id)
    .fetch_optional(pool)
    .await?;

    let rating = match existing {
        Some(rate_id) => {
            sqlx::query_as::<_, RatingResponse>(
                r#"
                UPDATE rate_datasets
                SET rate = $1, comment = $2, rated_date = now()
                WHERE id = $3
                RETURNING id, user_id, dataset_id, rate, comment, rated_date
                "#,
            )
            .bind(command.rate)
            .bind(&command.comment)
            .bind(rate_id)
            .fetch_one(pool)
            .await?
        },
        None => {
            sqlx::query_as::<_, RatingResponse>(
                r#"
                INSERT INTO rate_datasets (user_id, dataset_id, rate, comment)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, dataset_id, rate, comment, rated_date
                "#,
            )
            .bind(user_id)
            .bind(dataset_id)
            .bind(command.rate)
            .bind(&command.comment)
            .fetch_one(pool)
            .await?
        },
    };

    tracing::info!(rating_id = rating.id, "Rating saved");

    Ok(rating)
}
