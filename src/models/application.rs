use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: i64,
    pub applicant_id: i64,
    pub job_id: i64,
    pub status: String,
    pub applied_on: DateTime<Utc>,
}

/// An application joined with its applicant and job in a single row.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: i64,
    pub status: String,
    pub applied_on: DateTime<Utc>,
    pub applicant_id: i64,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: Option<String>,
    pub applicant_resume: Option<String>,
    pub applicant_applied_on: DateTime<Utc>,
    pub job_id: i64,
    pub job_title: String,
    pub job_description: String,
    pub job_posted_on: DateTime<Utc>,
    pub job_application_count: i64,
}
