pub mod download;
pub mod download_selected;
pub mod view;

pub use download::DownloadHubfileError;
pub use download_selected::DownloadSelectedError;
pub use view::ViewHubfileError;

use sqlx::PgPool;

/// A hubfile together with the coordinates needed to find it on disk.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct HubfileLocation {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub dataset_id: i64,
}

/// Resolves a hubfile id to its name and the owning user/dataset pair.
pub(crate) async fn locate(pool: &PgPool, file_id: i64) -> Result<Option<HubfileLocation>, sqlx::Error> {
    sqlx::query_as::<_, HubfileLocation>(
        r#"
        SELECT h.id, h.name, d.user_id AS owner_id, d.id AS dataset_id
        FROM hubfiles h
        JOIN feature_models fm ON fm.id = h.feature_model_id
        JOIN data_sets d ON d.id = fm.data_set_id
        WHERE h.id = $1
        "#,
    )
    .bind(file_id)
    .fetch_optional(pool)
    .await
}

/// Records a file download keyed by browser cookie. Repeat downloads from
/// the same browser are no-ops.
pub(crate) async fn record_download(
    pool: &PgPool,
    file_id: i64,
    viewer: Option<i64>,
    cookie: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO hubfile_download_records (user_id, file_id, download_cookie)
        VALUES ($1, $2, $3)
        ON CONFLICT (file_id, download_cookie) DO NOTHING
        "#,
    )
    .bind(viewer)
    .bind(file_id)
    .bind(cookie)
    .execute(pool)
    .await?;

    Ok(())
}
