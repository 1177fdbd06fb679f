use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use crate::dto::applicant_dto::ApplicantResponse;
use crate::dto::job_dto::JobResponse;
use crate::models::applicant::Applicant;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::models::job::Job;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApplicationPayload {
    pub applicant: i64,
    pub job: i64,
    #[serde(default)]
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateApplicationPayload {
    pub applicant: Option<i64>,
    pub job: Option<i64>,
    pub status: Option<ApplicationStatus>,
}

impl From<CreateApplicationPayload> for UpdateApplicationPayload {
    fn from(value: CreateApplicationPayload) -> Self {
        Self {
            applicant: Some(value.applicant),
            job: Some(value.job),
            status: Some(value.status),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyPayload {
    pub applicant_id: i64,
    pub job_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct ApplicationListQuery {
    pub page: Option<i64>,
    pub status: Option<String>,
    pub applicant: Option<i64>,
    pub job: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: i64,
    pub applicant: i64,
    pub applicant_details: ApplicantResponse,
    pub job: i64,
    pub job_details: JobResponse,
    pub status: String,
    pub applied_on: DateTime<Utc>,
}

impl ApplicationResponse {
    pub fn new(row: ApplicationRow, media_url: &str) -> Self {
        let applicant = Applicant {
            id: row.applicant_id,
            name: row.applicant_name,
            email: row.applicant_email,
            phone: row.applicant_phone,
            resume: row.applicant_resume,
            applied_on: row.applicant_applied_on,
        };
        let job = Job {
            id: row.job_id,
            title: row.job_title,
            description: row.job_description,
            posted_on: row.job_posted_on,
            application_count: row.job_application_count,
        };
        Self {
            id: row.id,
            applicant: applicant.id,
            applicant_details: ApplicantResponse::new(applicant, media_url),
            job: job.id,
            job_details: JobResponse::from(job),
            status: row.status,
            applied_on: row.applied_on,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub message: String,
    pub application: ApplicationResponse,
}
