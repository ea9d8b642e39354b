use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub display_name: String,
    pub user_type: String,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub skills: Option<String>,
    pub resume_key: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    pub fn kind(&self) -> Option<UserType> {
        self.user_type.parse().ok()
    }
}

/// Role chosen at registration; never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Recruiter,
    Jobseeker,
}

impl UserType {
    pub const ALL: [UserType; 2] = [UserType::Recruiter, UserType::Jobseeker];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Recruiter => "recruiter",
            UserType::Jobseeker => "jobseeker",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Recruiter => "Recruiter",
            UserType::Jobseeker => "Jobseeker",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recruiter" => Ok(UserType::Recruiter),
            "jobseeker" => Ok(UserType::Jobseeker),
            other => Err(format!("'{other}' is not a valid user type")),
        }
    }
}
