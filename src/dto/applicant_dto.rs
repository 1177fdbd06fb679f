use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use crate::models::applicant::Applicant;
use crate::utils::validation::validate_phone;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApplicantPayload {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: String,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters.")
    )]
    pub email: String,
    #[validate(
        length(max = 15, message = "Ensure this field has no more than 15 characters."),
        custom(function = "validate_phone")
    )]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateApplicantPayload {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters."))]
    pub name: Option<String>,
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Email must be at most 254 characters.")
    )]
    pub email: Option<String>,
    #[validate(
        length(max = 15, message = "Ensure this field has no more than 15 characters."),
        custom(function = "validate_phone")
    )]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct ApplicantListQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Public URL under the media prefix, e.g. `/media/resumes/<uuid>.pdf`.
    pub resume: Option<String>,
    pub applied_on: DateTime<Utc>,
}

impl ApplicantResponse {
    pub fn new(value: Applicant, media_url: &str) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            resume: value.resume.map(|path| media_path(media_url, &path)),
            applied_on: value.applied_on,
        }
    }
}

pub fn media_path(media_url: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}
