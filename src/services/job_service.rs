use crate::database::contains_pattern;
use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::dto::pagination::{Page, PageRequest};
use crate::error::{Error, Result};
use crate::models::job::Job;
use sqlx::PgPool;

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateJobPayload) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, posted_on, 0::bigint AS application_count
            "#,
        )
        .bind(payload.title.trim())
        .bind(&payload.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(job_id = job.id, "job created");
        Ok(job)
    }

    pub async fn update(&self, id: i64, payload: UpdateJobPayload) -> Result<Job> {
        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(payload.title.as_deref().map(str::trim))
        .bind(payload.description)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.get_by_id(id).await,
            None => Err(Error::NotFound("Job not found".into())),
        }
    }

    pub async fn find(&self, id: i64) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT
                j.id, j.title, j.description, j.posted_on,
                (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
            FROM jobs j
            WHERE j.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Job> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Job not found".into()));
        }
        tracing::info!(job_id = id, "job deleted");
        Ok(())
    }

    pub async fn list(&self, query: &JobListQuery, request: PageRequest) -> Result<Page<Job>> {
        let pattern = query
            .title
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(contains_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs WHERE ($1::text IS NULL OR title ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        request.ensure_in_range(total)?;

        let items = sqlx::query_as::<_, Job>(
            r#"
            SELECT
                j.id, j.title, j.description, j.posted_on,
                (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
            FROM jobs j
            WHERE ($1::text IS NULL OR j.title ILIKE $1)
            ORDER BY j.posted_on DESC, j.id DESC
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
