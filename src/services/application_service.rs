use crate::database::constraint::{is_foreign_key_violation, unique_violation};
use crate::dto::application_dto::{
    ApplicationListQuery, ApplyPayload, CreateApplicationPayload, UpdateApplicationPayload,
};
use crate::dto::pagination::{Page, PageRequest};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationRow, ApplicationStatus};
use crate::utils::validation::missing_reference;
use serde_json::{json, Map, Value as JsonValue};
use sqlx::PgPool;
use validator::ValidationErrors;

pub const DUPLICATE_APPLICATION: &str =
    "This applicant has already applied for this job. Duplicate applications are not allowed.";

const UNIQUE_APPLICANT_JOB: &str = "unique_applicant_job";

const APPLICATION_SELECT: &str = r#"
    SELECT
        a.id, a.status, a.applied_on,
        ap.id AS applicant_id,
        ap.name AS applicant_name,
        ap.email AS applicant_email,
        ap.phone AS applicant_phone,
        ap.resume AS applicant_resume,
        ap.applied_on AS applicant_applied_on,
        j.id AS job_id,
        j.title AS job_title,
        j.description AS job_description,
        j.posted_on AS job_posted_on,
        (SELECT COUNT(*) FROM applications x WHERE x.job_id = j.id) AS job_application_count
    FROM applications a
    JOIN applicants ap ON ap.id = a.applicant_id
    JOIN jobs j ON j.id = a.job_id
"#;

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

/// Storage is the authority on duplicates: a lost race against a concurrent
/// insert ends here with the same error the pre-check gives.
fn map_write_error(err: sqlx::Error) -> Error {
    if unique_violation(&err) == Some(UNIQUE_APPLICANT_JOB) {
        tracing::warn!("duplicate application rejected by storage constraint");
        return Error::DuplicateApplication(DUPLICATE_APPLICATION.into());
    }
    if is_foreign_key_violation(&err) {
        return Error::BadRequest("Referenced applicant or job no longer exists.".into());
    }
    err.into()
}

fn apply_failed(field: &str, message: String) -> Error {
    let mut details = Map::new();
    details.insert(field.to_string(), json!([message]));
    Error::ApplyFailed(JsonValue::Object(details))
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn applicant_name(&self, id: i64) -> Result<Option<String>> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM applicants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name)
    }

    async fn job_title(&self, id: i64) -> Result<Option<String>> {
        let title = sqlx::query_scalar::<_, String>("SELECT title FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(title)
    }

    pub async fn exists_for_pair(&self, applicant_id: i64, job_id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM applications WHERE applicant_id = $1 AND job_id = $2)",
        )
        .bind(applicant_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn ensure_references(&self, applicant_id: Option<i64>, job_id: Option<i64>) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if let Some(id) = applicant_id {
            if self.applicant_name(id).await?.is_none() {
                errors.add("applicant", missing_reference(id));
            }
        }
        if let Some(id) = job_id {
            if self.job_title(id).await?.is_none() {
                errors.add("job", missing_reference(id));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }

    async fn insert(
        &self,
        applicant_id: i64,
        job_id: i64,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (applicant_id, job_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, applicant_id, job_id, status, applied_on
            "#,
        )
        .bind(applicant_id)
        .bind(job_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::info!(
            application_id = application.id,
            applicant_id,
            job_id,
            "application created"
        );
        Ok(application)
    }

    pub async fn create(&self, payload: CreateApplicationPayload) -> Result<ApplicationRow> {
        self.ensure_references(Some(payload.applicant), Some(payload.job))
            .await?;
        if self.exists_for_pair(payload.applicant, payload.job).await? {
            return Err(Error::DuplicateApplication(DUPLICATE_APPLICATION.into()));
        }
        let application = self
            .insert(payload.applicant, payload.job, payload.status)
            .await?;
        self.get_by_id(application.id).await
    }

    /// The `POST /api/apply/` flow. Failures carry per-field details rather
    /// than plain validation errors.
    pub async fn apply(&self, payload: ApplyPayload) -> Result<ApplicationRow> {
        let applicant_name = self.applicant_name(payload.applicant_id).await?;
        let job_title = self.job_title(payload.job_id).await?;

        let mut details = Map::new();
        if applicant_name.is_none() {
            details.insert(
                "applicant_id".into(),
                json!([format!("Applicant with ID {} does not exist.", payload.applicant_id)]),
            );
        }
        if job_title.is_none() {
            details.insert(
                "job_id".into(),
                json!([format!("Job with ID {} does not exist.", payload.job_id)]),
            );
        }
        let (Some(applicant_name), Some(job_title)) = (applicant_name, job_title) else {
            return Err(Error::ApplyFailed(JsonValue::Object(details)));
        };

        let duplicate = format!(
            "{} has already applied for {}. Duplicate applications are not allowed.",
            applicant_name, job_title
        );
        if self
            .exists_for_pair(payload.applicant_id, payload.job_id)
            .await?
        {
            return Err(apply_failed("non_field_errors", duplicate));
        }

        let application = match self
            .insert(payload.applicant_id, payload.job_id, ApplicationStatus::Applied)
            .await
        {
            Ok(application) => application,
            Err(Error::DuplicateApplication(_)) => {
                return Err(apply_failed("non_field_errors", duplicate));
            }
            Err(err) => return Err(err),
        };
        self.get_by_id(application.id).await
    }

    pub async fn update(
        &self,
        id: i64,
        payload: UpdateApplicationPayload,
    ) -> Result<ApplicationRow> {
        let current = sqlx::query_as::<_, Application>(
            "SELECT id, applicant_id, job_id, status, applied_on FROM applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".into()))?;

        self.ensure_references(payload.applicant, payload.job).await?;

        let applicant_id = payload.applicant.unwrap_or(current.applicant_id);
        let job_id = payload.job.unwrap_or(current.job_id);
        let pair_changed = applicant_id != current.applicant_id || job_id != current.job_id;
        if pair_changed && self.exists_for_pair(applicant_id, job_id).await? {
            return Err(Error::DuplicateApplication(DUPLICATE_APPLICATION.into()));
        }

        sqlx::query(
            r#"
            UPDATE applications
            SET applicant_id = $2, job_id = $3, status = COALESCE($4, status)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(applicant_id)
        .bind(job_id)
        .bind(payload.status.map(|s| s.as_str()))
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        self.get_by_id(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<ApplicationRow> {
        let sql = format!("{} WHERE a.id = $1", APPLICATION_SELECT);
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| Error::NotFound("Application not found".into()))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Application not found".into()));
        }
        Ok(())
    }

    pub async fn list(
        &self,
        query: &ApplicationListQuery,
        request: PageRequest,
    ) -> Result<Page<ApplicationRow>> {
        let status = query.status.as_deref().filter(|s| !s.is_empty());
        let filters = r#"
            WHERE ($1::text IS NULL OR a.status = $1)
              AND ($2::bigint IS NULL OR a.applicant_id = $2)
              AND ($3::bigint IS NULL OR a.job_id = $3)
        "#;

        let total_query = format!("SELECT COUNT(*) FROM applications a {}", filters);
        let total = sqlx::query_scalar::<_, i64>(&total_query)
            .bind(status)
            .bind(query.applicant)
            .bind(query.job)
            .fetch_one(&self.pool)
            .await?;
        request.ensure_in_range(total)?;

        let items_query = format!(
            "{} {} ORDER BY a.applied_on DESC, a.id DESC LIMIT $4 OFFSET $5",
            APPLICATION_SELECT, filters
        );
        let items = sqlx::query_as::<_, ApplicationRow>(&items_query)
            .bind(status)
            .bind(query.applicant)
            .bind(query.job)
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(items, total, request))
    }
}
