use validator::Validate;

use crate::forms::{blank_to_none, check, FieldErrors};
use crate::multipart::MultipartForm;

/// Profile edit form. Every field is optional: fields that were not submitted
/// are left unchanged. `user_type` is fixed at registration and not accepted here.
#[derive(Debug, Default, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 100, message = "Enter a display name of at most 100 characters."))]
    pub display_name: Option<String>,
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub skills: Option<String>,
    /// Set when the user ticked "clear" for the stored resume.
    pub clear_resume: bool,
}

/// A validated partial update; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub company_name: Option<Option<String>>,
    pub company_description: Option<Option<String>>,
    pub skills: Option<Option<String>>,
    pub resume_key: Option<Option<String>>,
}

impl ProfileForm {
    pub fn from_multipart(form: &mut MultipartForm) -> Self {
        ProfileForm {
            display_name: form.take_text("display_name"),
            company_name: form.take_text("company_name"),
            company_description: form.take_text("company_description"),
            skills: form.take_text("skills"),
            clear_resume: form
                .take_text("clear_resume")
                .map(|v| matches!(v.trim(), "on" | "true" | "1"))
                .unwrap_or(false),
        }
    }

    pub fn clean(self) -> Result<ProfileChanges, FieldErrors> {
        let form = ProfileForm {
            display_name: self.display_name.map(|v| v.trim().to_string()),
            company_name: self.company_name.map(|v| v.trim().to_string()),
            ..self
        };

        let errors = check(&form);
        let changes = ProfileChanges {
            display_name: form.display_name,
            company_name: form.company_name.map(|v| blank_to_none(Some(v))),
            company_description: form.company_description.map(|v| blank_to_none(Some(v))),
            skills: form.skills.map(|v| blank_to_none(Some(v))),
            resume_key: form.clear_resume.then_some(None),
        };
        errors.finish(changes)
    }
}
