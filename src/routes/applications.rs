use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        application_dto::{
            ApplicationListQuery, ApplicationResponse, ApplyPayload, ApplyResponse,
            CreateApplicationPayload, UpdateApplicationPayload,
        },
        pagination::PageRequest,
    },
    error::Result,
    extract::{QueryParams, ValidatedJson},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/applications/",
    params(ApplicationListQuery),
    responses(
        (status = 200, description = "Page of applications"),
        (status = 404, description = "Invalid page")
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let request = PageRequest::new(query.page, state.config.page_size)?;
    let page = state.application_service.list(&query, request).await?;
    let media_url = &state.config.media_url;
    Ok(Json(page.map(|row| ApplicationResponse::new(row, media_url))))
}

#[utoipa::path(
    post,
    path = "/api/applications/",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application created", body = Json<ApplicationResponse>),
        (status = 400, description = "Invalid payload or duplicate application")
    )
)]
#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let row = state.application_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::new(row, &state.config.media_url)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}/",
    params(("id" = i64, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application found", body = Json<ApplicationResponse>),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let row = state.application_service.get_by_id(id).await?;
    Ok(Json(ApplicationResponse::new(row, &state.config.media_url)))
}

#[utoipa::path(
    put,
    path = "/api/applications/{id}/",
    params(("id" = i64, Path, description = "Application ID")),
    request_body = CreateApplicationPayload,
    responses(
        (status = 200, description = "Application replaced", body = Json<ApplicationResponse>),
        (status = 400, description = "Invalid payload or duplicate application"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn replace_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let row = state.application_service.update(id, payload.into()).await?;
    Ok(Json(ApplicationResponse::new(row, &state.config.media_url)))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}/",
    params(("id" = i64, Path, description = "Application ID")),
    request_body = UpdateApplicationPayload,
    responses(
        (status = 200, description = "Application updated", body = Json<ApplicationResponse>),
        (status = 400, description = "Invalid payload or duplicate application"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let row = state.application_service.update(id, payload).await?;
    Ok(Json(ApplicationResponse::new(row, &state.config.media_url)))
}

#[utoipa::path(
    delete,
    path = "/api/applications/{id}/",
    params(("id" = i64, Path, description = "Application ID")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.application_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/apply/",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplyResponse>),
        (status = 400, description = "Unknown applicant or job, or duplicate application")
    )
)]
#[axum::debug_handler]
pub async fn apply_for_job(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ApplyPayload>,
) -> Result<impl IntoResponse> {
    let row = state.application_service.apply(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            message: "Application submitted successfully".into(),
            application: ApplicationResponse::new(row, &state.config.media_url),
        }),
    ))
}
