use crate::database::constraint::unique_violation;
use crate::database::contains_pattern;
use crate::dto::applicant_dto::{
    ApplicantListQuery, CreateApplicantPayload, UpdateApplicantPayload,
};
use crate::dto::pagination::{Page, PageRequest};
use crate::error::{Error, Result};
use crate::models::applicant::Applicant;
use crate::utils::validation::normalize_email;
use sqlx::PgPool;

#[derive(Clone)]
pub struct ApplicantService {
    pool: PgPool,
}

fn map_write_error(err: sqlx::Error) -> Error {
    match unique_violation(&err) {
        Some("applicants_email_key") => Error::field(
            "email",
            "unique",
            "applicant with this email already exists.",
        ),
        _ => err.into(),
    }
}

fn blank_to_none(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

impl ApplicantService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateApplicantPayload) -> Result<Applicant> {
        let email = normalize_email(&payload.email);

        let applicant = sqlx::query_as::<_, Applicant>(
            r#"
            INSERT INTO applicants (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, phone, resume, applied_on
            "#,
        )
        .bind(payload.name.trim())
        .bind(&email)
        .bind(blank_to_none(payload.phone))
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::info!(applicant_id = applicant.id, "applicant created");
        Ok(applicant)
    }

    /// Full replacement: a missing or null `phone` clears the stored one.
    pub async fn replace(&self, id: i64, payload: CreateApplicantPayload) -> Result<Applicant> {
        let email = normalize_email(&payload.email);

        let applicant = sqlx::query_as::<_, Applicant>(
            r#"
            UPDATE applicants
            SET name = $2, email = $3, phone = $4
            WHERE id = $1
            RETURNING id, name, email, phone, resume, applied_on
            "#,
        )
        .bind(id)
        .bind(payload.name.trim())
        .bind(&email)
        .bind(blank_to_none(payload.phone))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        applicant.ok_or_else(|| Error::NotFound("Applicant not found".into()))
    }

    /// Partial update. An absent `phone` is left alone; an empty one clears it.
    pub async fn update(&self, id: i64, payload: UpdateApplicantPayload) -> Result<Applicant> {
        let email = payload.email.as_deref().map(normalize_email);
        let phone_supplied = payload.phone.is_some();

        let applicant = sqlx::query_as::<_, Applicant>(
            r#"
            UPDATE applicants
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = CASE WHEN $4 THEN $5 ELSE phone END
            WHERE id = $1
            RETURNING id, name, email, phone, resume, applied_on
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref().map(str::trim))
        .bind(email)
        .bind(phone_supplied)
        .bind(blank_to_none(payload.phone))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        applicant.ok_or_else(|| Error::NotFound("Applicant not found".into()))
    }

    pub async fn set_resume(&self, id: i64, resume: &str) -> Result<Applicant> {
        let applicant = sqlx::query_as::<_, Applicant>(
            r#"
            UPDATE applicants
            SET resume = $2
            WHERE id = $1
            RETURNING id, name, email, phone, resume, applied_on
            "#,
        )
        .bind(id)
        .bind(resume)
        .fetch_optional(&self.pool)
        .await?;

        applicant.ok_or_else(|| Error::NotFound("Applicant not found".into()))
    }

    pub async fn find(&self, id: i64) -> Result<Option<Applicant>> {
        let applicant = sqlx::query_as::<_, Applicant>(
            "SELECT id, name, email, phone, resume, applied_on FROM applicants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(applicant)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Applicant> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Applicant not found".into()))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM applicants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Applicant not found".into()));
        }
        tracing::info!(applicant_id = id, "applicant deleted");
        Ok(())
    }

    /// `search` matches name or email, case-insensitively.
    pub async fn list(
        &self,
        query: &ApplicantListQuery,
        request: PageRequest,
    ) -> Result<Page<Applicant>> {
        let pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(contains_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM applicants
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        request.ensure_in_range(total)?;

        let items = sqlx::query_as::<_, Applicant>(
            r#"
            SELECT id, name, email, phone, resume, applied_on
            FROM applicants
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
            ORDER BY applied_on DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(request.per_page)
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, total, request))
    }
}
