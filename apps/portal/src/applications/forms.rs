use serde::Deserialize;
use uuid::Uuid;

use crate::forms::{blank_to_none, FieldErrors};
use crate::models::application::ApplicationStatus;
use crate::models::user::ProfileRow;
use crate::multipart::MultipartForm;
use crate::storage::ResumeUpload;

/// Application form as submitted. Fields the applicant did not send fall back
/// to their profile; fields sent blank are stored blank.
#[derive(Debug, Default)]
pub struct ApplicationForm {
    pub skills: Option<String>,
    pub cover_letter: Option<String>,
    pub resume: Option<ResumeUpload>,
}

impl ApplicationForm {
    pub fn from_multipart(mut form: MultipartForm) -> Self {
        ApplicationForm {
            skills: form.take_text("skills"),
            cover_letter: form.take_text("cover_letter"),
            resume: form.take_file("resume"),
        }
    }

    /// Skills recorded on the application.
    pub fn skills_snapshot(&self, profile: &ProfileRow) -> Option<String> {
        match &self.skills {
            Some(submitted) => blank_to_none(Some(submitted.clone())),
            None => blank_to_none(profile.skills.clone()),
        }
    }

    pub fn cover_letter(&self) -> Option<String> {
        blank_to_none(self.cover_letter.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusUpdateForm {
    pub application_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub application_id: Uuid,
    pub status: ApplicationStatus,
}

impl StatusUpdateForm {
    /// Only the four defined statuses are accepted.
    pub fn clean(self) -> Result<StatusUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let application_id = Uuid::parse_str(self.application_id.trim()).ok();
        if application_id.is_none() {
            errors.add("application_id", "Enter a valid application id.");
        }
        let status = self.status.trim().parse::<ApplicationStatus>().ok();
        if status.is_none() {
            errors.add(
                "status",
                format!(
                    "Select a valid choice. '{}' is not one of the available choices.",
                    self.status
                ),
            );
        }

        match (application_id, status) {
            (Some(application_id), Some(status)) => Ok(StatusUpdate {
                application_id,
                status,
            }),
            _ => Err(errors),
        }
    }
}
