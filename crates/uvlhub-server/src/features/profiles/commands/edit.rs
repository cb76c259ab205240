//! Edit the caller's profile

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::validation::{
    validate_orcid, validate_text, OrcidValidationError, TextValidationError,
};

/// Command to update profile fields
#[derive(Debug, Deserialize)]
pub struct EditProfileCommand {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub orcid: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub public_data: Option<bool>,
}

/// Errors that can occur editing a profile
#[derive(Debug, thiserror::Error)]
pub enum EditProfileError {
    #[error("{0}")]
    Validation(#[from] TextValidationError),

    #[error("{0}")]
    Orcid(#[from] OrcidValidationError),

    #[error("Profile for user {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Response for the edit-profile command
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub name: String,
    pub surname: String,
    pub orcid: Option<String>,
    pub affiliation: Option<String>,
    pub public_data: bool,
}

impl EditProfileCommand {
    /// Validate field lengths and the optional ORCID format
    pub fn validate(&self) -> Result<(), EditProfileError> {
        validate_text(&self.name, "name", 100)?;
        validate_text(&self.surname, "surname", 100)?;
        if let Some(affiliation) = &self.affiliation {
            validate_text(affiliation, "affiliation", 100)?;
        }
        if let Some(orcid) = &self.orcid {
            if !orcid.is_empty() {
                validate_orcid(orcid)?;
            }
        }
        Ok(())
    }
}

/// Handles the edit-profile command
#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: &PgPool,
    user_id: i64,
    command: EditProfileCommand,
) -> Result<ProfileResponse, EditProfileError> {
    command.validate()?;

    let orcid = command.orcid.filter(|o| !o.is_empty());

    let profile = sqlx::query_as::<_, ProfileResponse>(
        r#"
        UPDATE user_profiles
        SET name = $1,
            surname = $2,
            orcid = $3,
            affiliation = $4,
            public_data = COALESCE($5, public_data)
        WHERE user_id = $6
        RETURNING user_id, name, surname, orcid, affiliation, public_data
        "#,
    )
    .bind(&command.name)
    .bind(&command.surname)
    .bind(&orcid)
    .bind(&command.affiliation)
    .bind(command.public_data)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(EditProfileError::NotFound(user_id))?;

    tracing::info!("Profile updated");

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> EditProfileCommand {
        EditProfileCommand {
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            orcid: Some("0000-0002-1825-0097".to_string()),
            affiliation: Some("University of London".to_string()),
            public_data: Some(true),
        }
    }

    #[test]
    fn test_valid_command_passes() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut cmd = command();
        cmd.name = "  ".to_string();
        assert!(matches!(cmd.validate(), Err(EditProfileError::Validation(_))));
    }

    #[test]
    fn test_bad_orcid_is_rejected() {
        let mut cmd = command();
        cmd.orcid = Some("not-an-orcid".to_string());
        assert!(matches!(cmd.validate(), Err(EditProfileError::Orcid(_))));
    }

    #[test]
    fn test_empty_orcid_is_allowed() {
        let mut cmd = command();
        cmd.orcid = Some(String::new());
        assert!(cmd.validate().is_ok());
    }
}
