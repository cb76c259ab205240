//! Edit an existing rating
//!
//! Only the rating's author may change it. An attempt by anyone else leaves
//! the stored score and comment untouched.

use serde::Deserialize;
use sqlx::PgPool;

use crate::features::shared::validation::{validate_rate, RateValidationError};

use super::create::RatingResponse;

/// Command to edit a rating
#[derive(Debug, Deserialize)]
pub struct EditRatingCommand {
    pub rate: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Errors that can occur editing a rating
#[derive(Debug, thiserror::Error)]
pub enum EditRatingError {
    #[error("{0}")]
    Validation(#[from] RateValidationError),

    #[error("Rating with id {0} not found")]
    NotFound(i64),

    #[error("You are not authorized to edit this rate")]
    NotOwner,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handles the edit-rating command
#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: &PgPool,
    user_id: i64,
    dataset_id: i64,
    rate_id: i64,
    command: EditRatingCommand,
) -> Result<RatingResponse, EditRatingError> {
    validate_rate(command.rate)?;

    let owner = sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM rate_datasets WHERE id = $1 AND dataset_id = $2",
    )
    .bind(rate_id)
    .bind(dataset_id)
    .fetch_optional(pool)
    .await?
    .ok_or(EditRatingError::NotFound(rate_id))?;

    if owner != user_id {
        return Err(EditRatingError::NotOwner);
    }

    let rating = sqlx::query_as::<_, RatingResponse>(
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
    .await?;

    tracing::info!(rating_id = rating.id, "Rating updated");

    Ok(rating)
}
