use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        pagination::PageRequest,
        product_dto::{
            CreateProductPayload, ProductListQuery, ProductResponse, UpdateProductPayload,
        },
    },
    error::Result,
    extract::{QueryParams, ValidatedJson},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/products/",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Page of products"),
        (status = 404, description = "Invalid page")
    )
)]
#[axum::debug_handler]
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProductListQuery>,
) -> Result<impl IntoResponse> {
    let request = PageRequest::new(query.page, state.config.page_size)?;
    let page = state.product_service.list(&query, request).await?;
    Ok(Json(page.map(ProductResponse::from)))
}

#[utoipa::path(
    post,
    path = "/api/products/",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Product created", body = Json<ProductResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductPayload>,
) -> Result<impl IntoResponse> {
    let product = state.product_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Json<ProductResponse>),
        (status = 404, description = "Product not found")
    )
)]
#[axum::debug_handler]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let product = state.product_service.get_by_id(id).await?;
    Ok(Json(ProductResponse::from(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = CreateProductPayload,
    responses(
        (status = 200, description = "Product replaced", body = Json<ProductResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Product not found")
    )
)]
#[axum::debug_handler]
pub async fn replace_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateProductPayload>,
) -> Result<impl IntoResponse> {
    let product = state.product_service.update(id, payload.into()).await?;
    Ok(Json(ProductResponse::from(product)))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Product updated", body = Json<ProductResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Product not found")
    )
)]
#[axum::debug_handler]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateProductPayload>,
) -> Result<impl IntoResponse> {
    let product = state.product_service.update(id, payload).await?;
    Ok(Json(ProductResponse::from(product)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.product_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
