use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        customer_dto::{
            CreateCustomerPayload, CustomerListQuery, CustomerResponse, UpdateCustomerPayload,
        },
        pagination::PageRequest,
    },
    error::Result,
    extract::{QueryParams, ValidatedJson},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/customers/",
    params(CustomerListQuery),
    responses(
        (status = 200, description = "Page of customers"),
        (status = 404, description = "Invalid page")
    )
)]
#[axum::debug_handler]
pub async fn list_customers(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CustomerListQuery>,
) -> Result<impl IntoResponse> {
    let request = PageRequest::new(query.page, state.config.page_size)?;
    let page = state.customer_service.list(&query, request).await?;
    Ok(Json(page.map(CustomerResponse::from)))
}

#[utoipa::path(
    post,
    path = "/api/customers/",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Customer created", body = Json<CustomerResponse>),
        (status = 400, description = "Invalid payload or duplicate email")
    )
)]
#[axum::debug_handler]
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCustomerPayload>,
) -> Result<impl IntoResponse> {
    let customer = state.customer_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(CustomerResponse::from(customer))))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}/",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer found", body = Json<CustomerResponse>),
        (status = 404, description = "Customer not found")
    )
)]
#[axum::debug_handler]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let customer = state.customer_service.get_by_id(id).await?;
    Ok(Json(CustomerResponse::from(customer)))
}

#[utoipa::path(
    put,
    path = "/api/customers/{id}/",
    params(("id" = i64, Path, description = "Customer ID")),
    request_body = CreateCustomerPayload,
    responses(
        (status = 200, description = "Customer replaced", body = Json<CustomerResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Customer not found")
    )
)]
#[axum::debug_handler]
pub async fn replace_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateCustomerPayload>,
) -> Result<impl IntoResponse> {
    let customer = state.customer_service.update(id, payload.into()).await?;
    Ok(Json(CustomerResponse::from(customer)))
}

#[utoipa::path(
    patch,
    path = "/api/customers/{id}/",
    params(("id" = i64, Path, description = "Customer ID")),
    request_body = UpdateCustomerPayload,
    responses(
        (status = 200, description = "Customer updated", body = Json<CustomerResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Customer not found")
    )
)]
#[axum::debug_handler]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateCustomerPayload>,
) -> Result<impl IntoResponse> {
    let customer = state.customer_service.update(id, payload).await?;
    Ok(Json(CustomerResponse::from(customer)))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}/",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer and their orders deleted"),
        (status = 404, description = "Customer not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.customer_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
