use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        applicant_dto::{
            ApplicantListQuery, ApplicantResponse, CreateApplicantPayload, UpdateApplicantPayload,
        },
        pagination::PageRequest,
    },
    error::{Error, Result},
    extract::{QueryParams, ValidatedJson},
    utils::media::store_resume,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/applicants/",
    params(ApplicantListQuery),
    responses(
        (status = 200, description = "Page of applicants"),
        (status = 404, description = "Invalid page")
    )
)]
#[axum::debug_handler]
pub async fn list_applicants(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ApplicantListQuery>,
) -> Result<impl IntoResponse> {
    let request = PageRequest::new(query.page, state.config.page_size)?;
    let page = state.applicant_service.list(&query, request).await?;
    let media_url = &state.config.media_url;
    Ok(Json(page.map(|a| ApplicantResponse::new(a, media_url))))
}

#[utoipa::path(
    post,
    path = "/api/applicants/",
    request_body = CreateApplicantPayload,
    responses(
        (status = 201, description = "Applicant created", body = Json<ApplicantResponse>),
        (status = 400, description = "Invalid payload or duplicate email")
    )
)]
#[axum::debug_handler]
pub async fn create_applicant(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateApplicantPayload>,
) -> Result<impl IntoResponse> {
    let applicant = state.applicant_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicantResponse::new(applicant, &state.config.media_url)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/applicants/{id}/",
    params(("id" = i64, Path, description = "Applicant ID")),
    responses(
        (status = 200, description = "Applicant found", body = Json<ApplicantResponse>),
        (status = 404, description = "Applicant not found")
    )
)]
#[axum::debug_handler]
pub async fn get_applicant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let applicant = state.applicant_service.get_by_id(id).await?;
    Ok(Json(ApplicantResponse::new(applicant, &state.config.media_url)))
}

#[utoipa::path(
    put,
    path = "/api/applicants/{id}/",
    params(("id" = i64, Path, description = "Applicant ID")),
    request_body = CreateApplicantPayload,
    responses(
        (status = 200, description = "Applicant replaced", body = Json<ApplicantResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Applicant not found")
    )
)]
#[axum::debug_handler]
pub async fn replace_applicant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateApplicantPayload>,
) -> Result<impl IntoResponse> {
    let applicant = state.applicant_service.replace(id, payload).await?;
    Ok(Json(ApplicantResponse::new(applicant, &state.config.media_url)))
}

#[utoipa::path(
    patch,
    path = "/api/applicants/{id}/",
    params(("id" = i64, Path, description = "Applicant ID")),
    request_body = UpdateApplicantPayload,
    responses(
        (status = 200, description = "Applicant updated", body = Json<ApplicantResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Applicant not found")
    )
)]
#[axum::debug_handler]
pub async fn update_applicant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateApplicantPayload>,
) -> Result<impl IntoResponse> {
    let applicant = state.applicant_service.update(id, payload).await?;
    Ok(Json(ApplicantResponse::new(applicant, &state.config.media_url)))
}

#[utoipa::path(
    delete,
    path = "/api/applicants/{id}/",
    params(("id" = i64, Path, description = "Applicant ID")),
    responses(
        (status = 204, description = "Applicant deleted"),
        (status = 404, description = "Applicant not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_applicant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.applicant_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/applicants/{id}/resume/",
    params(("id" = i64, Path, description = "Applicant ID")),
    responses(
        (status = 200, description = "Resume stored", body = Json<ApplicantResponse>),
        (status = 400, description = "Missing or unacceptable file"),
        (status = 404, description = "Applicant not found")
    )
)]
#[axum::debug_handler]
pub async fn upload_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    state.applicant_service.get_by_id(id).await?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("resume") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;

        let relative = store_resume(&state.config.media_root, &filename, &data).await?;
        let applicant = state.applicant_service.set_resume(id, &relative).await?;
        tracing::info!(applicant_id = id, resume = %relative, "resume uploaded");
        return Ok(Json(ApplicantResponse::new(
            applicant,
            &state.config.media_url,
        )));
    }

    Err(Error::field("resume", "required", "No file was submitted."))
}
