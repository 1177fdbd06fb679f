use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use crate::models::job::Job;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters."))]
    pub title: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters."))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: Option<String>,
}

impl From<CreateJobPayload> for UpdateJobPayload {
    fn from(value: CreateJobPayload) -> Self {
        Self {
            title: Some(value.title),
            description: Some(value.description),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub posted_on: DateTime<Utc>,
    pub application_count: i64,
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            posted_on: value.posted_on,
            application_count: value.application_count,
        }
    }
}
