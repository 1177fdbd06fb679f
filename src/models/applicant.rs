use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Applicant {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Path relative to the media root, e.g. `resumes/<uuid>.pdf`.
    pub resume: Option<String>,
    pub applied_on: DateTime<Utc>,
}
