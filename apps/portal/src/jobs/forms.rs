use serde::Deserialize;
use validator::Validate;

use crate::forms::{check, not_blank, FieldErrors};
use crate::models::job::JobCategory;

/// Job posting form, used both to create and to edit a job.
/// The recruiter is never part of the form; it always comes from the session.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct JobForm {
    #[validate(
        length(max = 200, message = "Ensure this value has at most 200 characters."),
        custom(function = "not_blank")
    )]
    pub title: String,
    #[validate(range(
        min = 1,
        max = 2147483647,
        message = "Ensure this value is a whole number of at least 1."
    ))]
    pub number_of_openings: i64,
    pub category: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(custom(function = "not_blank"))]
    pub skills_required: String,
}

/// A job posting that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub title: String,
    pub number_of_openings: i32,
    pub category: JobCategory,
    pub description: String,
    pub skills_required: String,
}

impl JobForm {
    pub fn clean(self) -> Result<JobDraft, FieldErrors> {
        let form = JobForm {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            skills_required: self.skills_required.trim().to_string(),
            ..self
        };

        let mut errors = check(&form);
        let category = form.category.parse::<JobCategory>().ok();
        if category.is_none() {
            errors.add(
                "category",
                format!(
                    "Select a valid choice. '{}' is not one of the available choices.",
                    form.category
                ),
            );
        }
        let openings = i32::try_from(form.number_of_openings).ok().filter(|n| *n >= 1);

        match (category, openings) {
            (Some(category), Some(number_of_openings)) if errors.is_empty() => Ok(JobDraft {
                title: form.title,
                number_of_openings,
                category,
                description: form.description,
                skills_required: form.skills_required,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> JobForm {
        JobForm {
            title: "Backend Engineer".to_string(),
            number_of_openings: 2,
            category: "tech".to_string(),
            description: "Build and run our APIs.".to_string(),
            skills_required: "rust, postgres".to_string(),
        }
    }

    #[test]
    fn test_valid_job() {
        let draft = valid_form().clean().unwrap();
        assert_eq!(draft.category, JobCategory::Tech);
        assert_eq!(draft.number_of_openings, 2);
    }

    #[test]
    fn test_zero_and_negative_openings_rejected() {
        for n in [0, -3] {
            let form = JobForm {
                number_of_openings: n,
                ..valid_form()
            };
            let errors = form.clean().unwrap_err();
            assert!(errors.has("number_of_openings"), "{n} should be rejected");
        }
    }

    #[test]
    fn test_openings_beyond_i32_rejected() {
        let form = JobForm {
            number_of_openings: i64::from(i32::MAX) + 1,
            ..valid_form()
        };
        assert!(form.clean().unwrap_err().has("number_of_openings"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let form = JobForm {
            category: "retail".to_string(),
            ..valid_form()
        };
        let errors = form.clean().unwrap_err();
        assert!(errors.has("category"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_blank_text_fields_rejected() {
        let form = JobForm {
            title: "   ".to_string(),
            description: String::new(),
            skills_required: "\n".to_string(),
            ..valid_form()
        };
        let errors = form.clean().unwrap_err();
        assert!(errors.has("title"));
        assert!(errors.has("description"));
        assert!(errors.has("skills_required"));
    }

    #[test]
    fn test_client_supplied_recruiter_is_ignored() {
        let form: JobForm = serde_json::from_str(
            r#"{
                "title": "Nurse",
                "number_of_openings": 1,
                "category": "healthcare",
                "description": "Night shifts",
                "skills_required": "triage",
                "recruiter_id": "00000000-0000-0000-0000-000000000000"
            }"#,
        )
        .unwrap();
        let draft = form.clean().unwrap();
        assert_eq!(draft.title, "Nurse");
    }
}
