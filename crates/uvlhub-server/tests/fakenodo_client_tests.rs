//! Integration tests for the archival-mirror client against a mock HTTP server

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uvlhub_common::types::PublicationType;
use uvlhub_server::features::fakenodo::{Creator, DepositionClient, DepositionMetadata, MirrorError};

fn sample_metadata() -> DepositionMetadata {
    DepositionMetadata::from_dataset(
        "Sample dataset",
        "A collection of UVL models",
        &PublicationType::None,
        Some("spl, variability"),
        vec![Creator {
            name: "Doe, Jane".to_string(),
            affiliation: None,
            orcid: Some("0000-0002-1825-0097".to_string()),
        }],
    )
}

#[tokio::test]
async fn test_create_deposition_returns_mirror_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/deposit/depositions"))
        .and(body_partial_json(serde_json::json!({
            "metadata": {
                "title": "Sample dataset",
                "upload_type": "dataset",
                "keywords": ["spl", "variability", "uvlhub"],
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 7,
            "status": "draft",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DepositionClient::new(server.uri());
    let id = client.create_deposition(&sample_metadata()).await.unwrap();
    assert_eq!(id, 7);
}

#[tokio::test]
async fn test_upload_file_sends_name_size_and_checksum() {
    let server = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("model.uvl");
    std::fs::write(&file_path, b"features\n    A\n").unwrap();

    Mock::given(method("POST"))
        .and(path("/deposit/depositions/7/files"))
        .and(body_partial_json(serde_json::json!({
            "name": "model.uvl",
            "size": 15,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 1,
            "name": "model.uvl",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DepositionClient::new(server.uri());
    client.upload_file(7, "model.uvl", &file_path).await.unwrap();
}

#[tokio::test]
async fn test_publish_returns_doi() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/deposit/depositions/7/actions/publish"))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "id": 7,
            "doi": "fakenodo.doi.7",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DepositionClient::new(server.uri());
    let doi = client.publish(7).await.unwrap();
    assert_eq!(doi, "fakenodo.doi.7");
}

#[tokio::test]
async fn test_publish_without_doi_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/deposit/depositions/8/actions/publish"))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "id": 8,
        })))
        .mount(&server)
        .await;

    let client = DepositionClient::new(server.uri());
    let result = client.publish(8).await;
    assert!(matches!(result, Err(MirrorError::MissingField("doi"))));
}

#[tokio::test]
async fn test_get_doi_for_unpublished_deposition() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deposit/depositions/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 9,
            "status": "draft",
            "doi": null,
        })))
        .mount(&server)
        .await;

    let client = DepositionClient::new(server.uri());
    let doi = client.get_doi(9).await.unwrap();
    assert_eq!(doi, None);
}

#[tokio::test]
async fn test_server_error_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/deposit/depositions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = DepositionClient::new(server.uri());
    let result = client.create_deposition(&sample_metadata()).await;
    assert!(matches!(result, Err(MirrorError::UnexpectedStatus(500))));
}
