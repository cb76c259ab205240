//! Delete a rating
//!
//! Only the rating's author may remove it.

use sqlx::PgPool;

/// Errors that can occur deleting a rating
#[derive(Debug, thiserror::Error)]
pub enum DeleteRatingError {
    #[error("Rating with id {0} not found")]
    NotFound(i64),

    #[error("You are not authorized to delete this rate")]
    NotOwner,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handles the delete-rating command
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: &PgPool,
    user_id: i64,
    dataset_id: i64,
    rate_id: i64,
) -> Result<(), DeleteRatingError> {
    let owner = sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM rate_datasets WHERE id = $1 AND dataset_id = $2",
    )
    .bind(rate_id)
    .bind(dataset_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DeleteRatingError::NotFound(rate_id))?;

    if owner != user_id {
        return Err(DeleteRatingError::NotOwner);
    }

    sqlx::query("DELETE FROM rate_datasets WHERE id = $1")
        .bind(rate_id)
        .execute(pool)
        .await?;

    tracing::info!(rating_id = rate_id, "Rating deleted");

    Ok(())
}
