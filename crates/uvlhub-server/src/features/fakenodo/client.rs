//! HTTP client for the archival mirror
//!
//! Mirroring a dataset is a four-step conversation: create a deposition from
//! the dataset metadata, upload each stored file, publish, then read back the
//! DOI. Every step is a separate HTTP call so a failure leaves an inspectable
//! deposition behind on the mirror.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use uvlhub_common::checksum::sha256_file_checksum;
use uvlhub_common::types::PublicationType;

/// Errors from talking to the archival mirror
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mirror returned unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("Mirror response missing field '{0}'")]
    MissingField(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Checksum error: {0}")]
    Checksum(#[from] uvlhub_common::HubError),
}

/// One dataset author as the mirror expects it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

/// Deposition metadata payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositionMetadata {
    pub title: String,
    pub upload_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_type: Option<String>,
    pub description: String,
    pub creators: Vec<Creator>,
    pub keywords: Vec<String>,
    pub access_right: String,
    pub license: String,
}

impl DepositionMetadata {
    /// Map dataset metadata to the mirror's deposition schema.
    ///
    /// Datasets without a publication type upload as `dataset`; anything else
    /// uploads as `publication` with the concrete type attached. Tags are
    /// comma-separated in storage and always gain the `uvlhub` keyword.
    pub fn from_dataset(
        title: &str,
        description: &str,
        publication_type: &PublicationType,
        tags: Option<&str>,
        creators: Vec<Creator>,
    ) -> Self {
        let is_plain_dataset = matches!(publication_type, PublicationType::None);

        let mut keywords: Vec<String> = match tags {
            Some(tags) if !tags.is_empty() => {
                tags.split(", ").map(|t| t.to_string()).collect()
            },
            _ => Vec::new(),
        };
        keywords.push("uvlhub".to_string());

        Self {
            title: title.to_string(),
            upload_type: if is_plain_dataset {
                "dataset".to_string()
            } else {
                "publication".to_string()
            },
            publication_type: Some(publication_type.as_str().to_string()),
            description: description.to_string(),
            creators,
            keywords,
            access_right: "open".to_string(),
            license: "CC-BY-4.0".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateDepositionResponse {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    doi: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetDepositionResponse {
    doi: Option<String>,
}

/// Client for the deposition API of the archival mirror
#[derive(Debug, Clone)]
pub struct DepositionClient {
    http: reqwest::Client,
    base_url: String,
}

impl DepositionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Create a deposition and return its mirror-side id.
    #[tracing::instrument(skip(self, metadata), fields(title = %metadata.title))]
    pub async fn create_deposition(
        &self,
        metadata: &DepositionMetadata,
    ) -> Result<i64, MirrorError> {
        let response = self
            .http
            .post(self.url("/deposit/depositions"))
            .json(&serde_json::json!({ "metadata": metadata }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MirrorError::UnexpectedStatus(response.status().as_u16()));
        }

        let body: CreateDepositionResponse = response.json().await?;
        Ok(body.id)
    }

    /// Register one stored file with a deposition. The file itself stays on
    /// the hub; the mirror records name, size, and SHA-256 checksum.
    #[tracing::instrument(skip(self, path))]
    pub async fn upload_file(
        &self,
        deposition_id: i64,
        name: &str,
        path: &Path,
    ) -> Result<(), MirrorError> {
        let size = std::fs::metadata(path)?.len();
        let checksum = sha256_file_checksum(path)?;

        let response = self
            .http
            .post(self.url(&format!("/deposit/depositions/{}/files", deposition_id)))
            .json(&serde_json::json!({
                "name": name,
                "size": size,
                "checksum": checksum,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MirrorError::UnexpectedStatus(response.status().as_u16()));
        }
        Ok(())
    }

    /// Publish a deposition and return the DOI the mirror assigned.
    #[tracing::instrument(skip(self))]
    pub async fn publish(&self, deposition_id: i64) -> Result<String, MirrorError> {
        let response = self
            .http
            .post(self.url(&format!(
                "/deposit/depositions/{}/actions/publish",
                deposition_id
            )))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MirrorError::UnexpectedStatus(response.status().as_u16()));
        }

        let body: PublishResponse = response.json().await?;
        body.doi.ok_or(MirrorError::MissingField("doi"))
    }

    /// Fetch the DOI of an existing deposition, if it has been published.
    #[tracing::instrument(skip(self))]
    pub async fn get_doi(&self, deposition_id: i64) -> Result<Option<String>, MirrorError> {
        let response = self
            .http
            .get(self.url(&format!("/deposit/depositions/{}", deposition_id)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MirrorError::UnexpectedStatus(response.status().as_u16()));
        }

        let body: GetDepositionResponse = response.json().await?;
        Ok(body.doi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_for_plain_dataset() {
        let metadata = DepositionMetadata::from_dataset(
            "Sample",
            "A sample dataset",
            &PublicationType::None,
            None,
            vec![],
        );
        assert_eq!(metadata.upload_type, "dataset");
        assert_eq!(metadata.keywords, vec!["uvlhub"]);
        assert_eq!(metadata.access_right, "open");
        assert_eq!(metadata.license, "CC-BY-4.0");
    }

    #[test]
    fn test_metadata_for_publication_with_tags() {
        let metadata = DepositionMetadata::from_dataset(
            "Paper",
            "desc",
            &PublicationType::JournalArticle,
            Some("spl, variability"),
            vec![Creator {
                name: "Doe, Jane".to_string(),
                affiliation: Some("Example University".to_string()),
                orcid: None,
            }],
        );
        assert_eq!(metadata.upload_type, "publication");
        assert_eq!(metadata.publication_type.as_deref(), Some("article"));
        assert_eq!(metadata.keywords, vec!["spl", "variability", "uvlhub"]);
    }
}
