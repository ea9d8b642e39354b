use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub number_of_openings: i32,
    pub category: String,
    pub description: String,
    pub skills_required: String,
    pub created_at: DateTime<Utc>,
}

/// A job together with how many applications it has received.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobRow,
    pub application_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobCategory {
    Tech,
    Finance,
    Healthcare,
    Education,
    Other,
}

impl JobCategory {
    pub const ALL: [JobCategory; 5] = [
        JobCategory::Tech,
        JobCategory::Finance,
        JobCategory::Healthcare,
        JobCategory::Education,
        JobCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobCategory::Tech => "tech",
            JobCategory::Finance => "finance",
            JobCategory::Healthcare => "healthcare",
            JobCategory::Education => "education",
            JobCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobCategory::Tech => "Technology",
            JobCategory::Finance => "Finance",
            JobCategory::Healthcare => "Healthcare",
            JobCategory::Education => "Education",
            JobCategory::Other => "Other",
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("'{s}' is not a valid category"))
    }
}
