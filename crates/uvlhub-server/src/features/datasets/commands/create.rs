//! Create dataset command
//!
//! Persists a dataset submission in one transaction: dataset metadata, its
//! authors, the dataset row, and per feature model the model metadata, model
//! authors, a feature_models row, and a hubfiles row with MD5 checksum and
//! size computed from the staged file. Any failure rolls everything back.
//!
//! After the commit the staged files move into the dataset's permanent
//! directory. That move is not transactional: a crash between commit and move
//! leaves the database referencing files still in staging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::validation::{
    is_uvl_filename, validate_orcid, validate_text, OrcidValidationError, TextValidationError,
};
use crate::storage::{FsStorage, StorageError};
use uvlhub_common::checksum::file_checksum_and_size;
use uvlhub_common::types::PublicationType;

/// One author attached to a dataset or a feature model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

/// One feature model in a dataset submission, referencing a staged UVL file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureModelInput {
    pub uvl_filename: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publication_type: Option<PublicationType>,
    #[serde(default)]
    pub publication_doi: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorInput>,
}

/// Command to create a dataset from staged files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDatasetCommand {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub publication_type: PublicationType,
    #[serde(default)]
    pub publication_doi: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub authors: Vec<AuthorInput>,
    pub feature_models: Vec<FeatureModelInput>,
}

/// Response from creating a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDatasetResponse {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub feature_model_count: usize,
}

/// Errors that can occur when creating a dataset
#[derive(Debug, thiserror::Error)]
pub enum CreateDatasetError {
    #[error("Validation failed: {0}")]
    Validation(#[from] TextValidationError),

    #[error("Author ORCID invalid: {0}")]
    Orcid(#[from] OrcidValidationError),

    #[error("A dataset needs at least one feature model")]
    NoFeatureModels,

    #[error("File '{0}' is not a UVL file")]
    NotUvl(String),

    #[error("Staged file '{0}' not found")]
    StagedFileMissing(String),

    #[error("Checksum failed: {0}")]
    Checksum(#[from] uvlhub_common::HubError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateDatasetCommand {
    /// Validates the command parameters
    pub fn validate(&self) -> Result<(), CreateDatasetError> {
        validate_text(&self.title, "title", 120)?;
        validate_text(&self.description, "description", 10_000)?;

        if self.feature_models.is_empty() {
            return Err(CreateDatasetError::NoFeatureModels);
        }

        for model in &self.feature_models {
            if !is_uvl_filename(&model.uvl_filename) {
                return Err(CreateDatasetError::NotUvl(model.uvl_filename.clone()));
            }
        }

        for author in self.authors.iter().chain(
            self.feature_models.iter().flat_map(|m| m.authors.iter()),
        ) {
            validate_text(&author.name, "author name", 120)?;
            if let Some(orcid) = &author.orcid {
                validate_orcid(orcid)?;
            }
        }

        Ok(())
    }
}

/// Handles the create dataset command
#[tracing::instrument(skip(pool, storage, command), fields(title = %command.title))]
pub async fn handle(
    pool: &PgPool,
    storage: &FsStorage,
    user_id: i64,
    command: CreateDatasetCommand,
) -> Result<CreateDatasetResponse, CreateDatasetError> {
    command.validate()?;

    // Every referenced file must be staged before the transaction opens.
    for model in &command.feature_models {
        if !storage.staged_path(user_id, &model.uvl_filename).is_file() {
            return Err(CreateDatasetError::StagedFileMissing(
                model.uvl_filename.clone(),
            ));
        }
    }

    let mut tx = pool.begin().await?;

    let ds_meta_data_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO ds_meta_data (title, description, publication_type, publication_doi, tags)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&command.title)
    .bind(&command.description)
    .bind(command.publication_type.as_str())
    .bind(&command.publication_doi)
    .bind(&command.tags)
    .fetch_one(&mut *tx)
    .await?;

    for author in &command.authors {
        sqlx::query(
            "INSERT INTO authors (name, affiliation, orcid, ds_meta_data_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(&author.name)
        .bind(&author.affiliation)
        .bind(&author.orcid)
        .bind(ds_meta_data_id)
        .execute(&mut *tx)
        .await?;
    }

    let (dataset_id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
        "INSERT INTO data_sets (user_id, ds_meta_data_id) VALUES ($1, $2) RETURNING id, created_at",
    )
    .bind(user_id)
    .bind(ds_meta_data_id)
    .fetch_one(&mut *tx)
    .await?;

    for model in &command.feature_models {
        let fm_meta_data_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO fm_meta_data
                (uvl_filename, title, description, publication_type, publication_doi, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&model.uvl_filename)
        .bind(model.title.as_deref().unwrap_or(&model.uvl_filename))
        .bind(model.description.as_deref().unwrap_or(""))
        .bind(model.publication_type.unwrap_or_default().as_str())
        .bind(&model.publication_doi)
        .bind(&model.tags)
        .fetch_one(&mut *tx)
        .await?;

        for author in &model.authors {
            sqlx::query(
                "INSERT INTO authors (name, affiliation, orcid, fm_meta_data_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(&author.name)
            .bind(&author.affiliation)
            .bind(&author.orcid)
            .bind(fm_meta_data_id)
            .execute(&mut *tx)
            .await?;
        }

        let feature_model_id: i64 = sqlx::query_scalar(
            "INSERT INTO feature_models (data_set_id, fm_meta_data_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(dataset_id)
        .bind(fm_meta_data_id)
        .fetch_one(&mut *tx)
        .await?;

        let staged = storage.staged_path(user_id, &model.uvl_filename);
        let (checksum, size) = file_checksum_and_size(&staged)?;

        sqlx::query(
            "INSERT INTO hubfiles (name, checksum, size, feature_model_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(&model.uvl_filename)
        .bind(&checksum)
        .bind(size as i64)
        .bind(feature_model_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    // Post-commit file relocation; not covered by the transaction above.
    storage.promote_staged(user_id, dataset_id)?;

    tracing::info!(
        dataset_id,
        feature_models = command.feature_models.len(),
        "Dataset created"
    );

    Ok(CreateDatasetResponse {
        id: dataset_id,
        title: command.title,
        created_at,
        feature_model_count: command.feature_models.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateDatasetCommand {
        CreateDatasetCommand {
            title: "Sample".to_string(),
            description: "A dataset".to_string(),
            publication_type: PublicationType::None,
            publication_doi: None,
            tags: None,
            authors: vec![],
            feature_models: vec![FeatureModelInput {
                uvl_filename: "model.uvl".to_string(),
                title: None,
                description: None,
                publication_type: None,
                publication_doi: None,
                tags: None,
                authors: vec![],
            }],
        }
    }

    #[test]
    fn test_valid_command() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_title() {
        let mut cmd = command();
        cmd.title = "  ".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(CreateDatasetError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_dataset_without_models() {
        let mut cmd = command();
        cmd.feature_models.clear();
        assert!(matches!(
            cmd.validate(),
            Err(CreateDatasetError::NoFeatureModels)
        ));
    }

    #[test]
    fn test_rejects_non_uvl_file() {
        let mut cmd = command();
        cmd.feature_models[0].uvl_filename = "model.xml".to_string();
        assert!(matches!(cmd.validate(), Err(CreateDatasetError::NotUvl(_))));
    }

    #[test]
    fn test_rejects_bad_orcid() {
        let mut cmd = command();
        cmd.authors.push(AuthorInput {
            name: "Doe, Jane".to_string(),
            affiliation: None,
            orcid: Some("not-an-orcid".to_string()),
        });
        assert!(matches!(cmd.validate(), Err(CreateDatasetError::Orcid(_))));
    }
}
