//! Common types used across UVLHub

use serde::{Deserialize, Serialize};

/// Publication type attached to dataset and feature-model metadata.
///
/// Stored as its Zenodo wire value (`"none"`, `"article"`, ...) so deposition
/// metadata can be forwarded to the archival mirror unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum PublicationType {
    #[default]
    #[serde(rename = "none")]
    #[sqlx(rename = "none")]
    None,
    #[serde(rename = "annotationcollection")]
    #[sqlx(rename = "annotationcollection")]
    AnnotationCollection,
    #[serde(rename = "book")]
    #[sqlx(rename = "book")]
    Book,
    #[serde(rename = "section")]
    #[sqlx(rename = "section")]
    BookSection,
    #[serde(rename = "conferencepaper")]
    #[sqlx(rename = "conferencepaper")]
    ConferencePaper,
    #[serde(rename = "datamanagementplan")]
    #[sqlx(rename = "datamanagementplan")]
    DataManagementPlan,
    #[serde(rename = "article")]
    #[sqlx(rename = "article")]
    JournalArticle,
    #[serde(rename = "patent")]
    #[sqlx(rename = "patent")]
    Patent,
    #[serde(rename = "preprint")]
    #[sqlx(rename = "preprint")]
    Preprint,
    #[serde(rename = "report")]
    #[sqlx(rename = "report")]
    Report,
    #[serde(rename = "softwaredocumentation")]
    #[sqlx(rename = "softwaredocumentation")]
    SoftwareDocumentation,
    #[serde(rename = "thesis")]
    #[sqlx(rename = "thesis")]
    Thesis,
    #[serde(rename = "technicalnote")]
    #[sqlx(rename = "technicalnote")]
    TechnicalNote,
    #[serde(rename = "workingpaper")]
    #[sqlx(rename = "workingpaper")]
    WorkingPaper,
    #[serde(rename = "other")]
    #[sqlx(rename = "other")]
    Other,
}

impl PublicationType {
    /// The Zenodo wire value for this publication type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationType::None => "none",
            PublicationType::AnnotationCollection => "annotationcollection",
            PublicationType::Book => "book",
            PublicationType::BookSection => "section",
            PublicationType::ConferencePaper => "conferencepaper",
            PublicationType::DataManagementPlan => "datamanagementplan",
            PublicationType::JournalArticle => "article",
            PublicationType::Patent => "patent",
            PublicationType::Preprint => "preprint",
            PublicationType::Report => "report",
            PublicationType::SoftwareDocumentation => "softwaredocumentation",
            PublicationType::Thesis => "thesis",
            PublicationType::TechnicalNote => "technicalnote",
            PublicationType::WorkingPaper => "workingpaper",
            PublicationType::Other => "other",
        }
    }
}

impl std::fmt::Display for PublicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a byte count the way dataset pages display file sizes.
pub fn human_readable_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if size < KB {
        format!("{} bytes", size)
    } else if size < MB {
        format!("{} KB", round2(size as f64 / KB as f64))
    } else if size < GB {
        format!("{} MB", round2(size as f64 / MB as f64))
    } else {
        format!("{} GB", round2(size as f64 / GB as f64))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_type_wire_values() {
        assert_eq!(PublicationType::JournalArticle.as_str(), "article");
        assert_eq!(PublicationType::None.to_string(), "none");
        let parsed: PublicationType = serde_json::from_str("\"datamanagementplan\"").unwrap();
        assert_eq!(parsed, PublicationType::DataManagementPlan);
    }

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable_size(512), "512 bytes");
        assert_eq!(human_readable_size(2048), "2 KB");
        assert_eq!(human_readable_size(1536), "1.5 KB");
        assert_eq!(human_readable_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(human_readable_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}
