use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        order_dto::{
            CreateOrderPayload, OrderListItemResponse, OrderListQuery, OrderResponse,
            UpdateOrderPayload,
        },
        pagination::PageRequest,
    },
    error::Result,
    extract::{QueryParams, ValidatedJson},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/orders/",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Page of orders"),
        (status = 400, description = "Unparseable date bound"),
        (status = 404, description = "Invalid page")
    )
)]
#[axum::debug_handler]
pub async fn list_orders(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<OrderListQuery>,
) -> Result<impl IntoResponse> {
    let request = PageRequest::new(query.page, state.config.page_size)?;
    let page = state.order_service.list(&query, request).await?;
    Ok(Json(page.map(OrderListItemResponse::from)))
}

#[utoipa::path(
    post,
    path = "/api/orders/",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Order and its items created", body = Json<OrderResponse>),
        (status = 400, description = "Invalid payload, unknown references or no items")
    )
)]
#[axum::debug_handler]
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrderPayload>,
) -> Result<impl IntoResponse> {
    let detail = state.order_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(detail))))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with customer and items", body = Json<OrderResponse>),
        (status = 404, description = "Order not found")
    )
)]
#[axum::debug_handler]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let detail = state.order_service.get_detail(id).await?;
    Ok(Json(OrderResponse::from(detail)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = CreateOrderPayload,
    responses(
        (status = 200, description = "Order replaced", body = Json<OrderResponse>),
        (status = 400, description = "Invalid payload, unknown references or no items"),
        (status = 404, description = "Order not found")
    )
)]
#[axum::debug_handler]
pub async fn replace_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateOrderPayload>,
) -> Result<impl IntoResponse> {
    let detail = state.order_service.update(id, payload.into()).await?;
    Ok(Json(OrderResponse::from(detail)))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateOrderPayload,
    responses(
        (status = 200, description = "Order updated", body = Json<OrderResponse>),
        (status = 400, description = "Invalid payload, unknown references or no items"),
        (status = 404, description = "Order not found")
    )
)]
#[axum::debug_handler]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderPayload>,
) -> Result<impl IntoResponse> {
    let detail = state.order_service.update(id, payload).await?;
    Ok(Json(OrderResponse::from(detail)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order and its items deleted"),
        (status = 404, description = "Order not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.order_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
