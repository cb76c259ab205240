//! Simulation of the archival mirror's HTTP API
//!
//! Mounted under `/fakenodo/api`, these routes answer the same conversation
//! the [`super::client::DepositionClient`] speaks, persisting depositions in
//! the `depositions` table so state survives restarts and parallel tests.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::api::response::{AppError, ErrorResponse};

pub fn fakenodo_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(test_connection))
        .route("/deposit/depositions", post(create_deposition))
        .route("/deposit/depositions", get(list_depositions))
        .route("/deposit/depositions/:id", get(get_deposition))
        .route("/deposit/depositions/:id", delete(delete_deposition))
        .route("/deposit/depositions/:id/files", post(upload_file))
        .route(
            "/deposit/depositions/:id/actions/publish",
            post(publish_deposition),
        )
}

#[derive(Debug, sqlx::FromRow)]
struct DepositionRow {
    id: i64,
    dep_metadata: serde_json::Value,
    status: String,
    doi: Option<String>,
}

async fn test_connection() -> Response {
    Json(json!({
        "status": "success",
        "message": "Connected to FakenodoAPI"
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
struct CreateDepositionBody {
    metadata: serde_json::Value,
}

#[tracing::instrument(skip(pool, body))]
async fn create_deposition(
    State(pool): State<PgPool>,
    Json(body): Json<CreateDepositionBody>,
) -> Result<Response, AppError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO depositions (dep_metadata, status) VALUES ($1, 'draft') RETURNING id",
    )
    .bind(&body.metadata)
    .fetch_one(&pool)
    .await?;

    tracing::info!(deposition_id = id, "Deposition created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "links": {
                "files": format!("/fakenodo/api/deposit/depositions/{}/files", id),
                "publish": format!("/fakenodo/api/deposit/depositions/{}/actions/publish", id),
            }
        })),
    )
        .into_response())
}

#[tracing::instrument(skip(pool))]
async fn list_depositions(State(pool): State<PgPool>) -> Result<Response, AppError> {
    let rows: Vec<DepositionRow> =
        sqlx::query_as("SELECT id, dep_metadata, status, doi FROM depositions ORDER BY id")
            .fetch_all(&pool)
            .await?;

    let depositions: Vec<_> = rows
        .iter()
        .map(|row| {
            json!({
                "id": row.id,
                "metadata": row.dep_metadata,
                "status": row.status,
                "doi": row.doi,
            })
        })
        .collect();

    Ok(Json(json!({ "depositions": depositions })).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_deposition(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let row: Option<DepositionRow> =
        sqlx::query_as("SELECT id, dep_metadata, status, doi FROM depositions WHERE id = $1")
            .bind(id)
            .fetch_optional(&pool)
            .await?;

    match row {
        Some(row) => Ok(Json(json!({
            "id": row.id,
            "metadata": row.dep_metadata,
            "status": row.status,
            "doi": row.doi,
        }))
        .into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("NOT_FOUND", "Deposition not found")),
        )
            .into_response()),
    }
}

#[tracing::instrument(skip(pool))]
async fn delete_deposition(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let result = sqlx::query("DELETE FROM depositions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("NOT_FOUND", "Deposition not found")),
        )
            .into_response());
    }

    Ok(Json(json!({
        "status": "success",
        "message": format!("Successfully deleted deposition {}", id),
    }))
    .into_response())
}

#[tracing::instrument(skip(pool))]
async fn upload_file(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM depositions WHERE id = $1)")
        .bind(id)
        .fetch_one(&pool)
        .await?;

    if !exists {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("NOT_FOUND", "Deposition not found")),
        )
            .into_response());
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "File uploaded successfully" })),
    )
        .into_response())
}

#[tracing::instrument(skip(pool))]
async fn publish_deposition(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let doi = format!("fakenodo.doi.{}", id);
    let result = sqlx::query("UPDATE depositions SET status = 'published', doi = $1 WHERE id = $2")
        .bind(&doi)
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("NOT_FOUND", "Deposition not found")),
        )
            .into_response());
    }

    tracing::info!(deposition_id = id, doi = %doi, "Deposition published");

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "id": id, "doi": doi })),
    )
        .into_response())
}
