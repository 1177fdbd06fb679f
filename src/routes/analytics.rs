use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::analytics_dto::{
        DateRangeQuery, SalesSummaryResponse, TopCustomersResponse, TopProductsResponse,
    },
    error::Result,
    extract::QueryParams,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/analytics/sales-summary/",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Totals over matched orders", body = Json<SalesSummaryResponse>),
        (status = 400, description = "Unparseable date bound")
    )
)]
#[axum::debug_handler]
pub async fn sales_summary(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DateRangeQuery>,
) -> Result<impl IntoResponse> {
    let range = query.resolve()?;
    let summary = state.analytics_service.sales_summary(&range).await?;
    Ok(Json(SalesSummaryResponse::new(summary, &range)))
}

#[utoipa::path(
    get,
    path = "/api/analytics/top-customers/",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Five biggest spenders", body = Json<TopCustomersResponse>),
        (status = 400, description = "Unparseable date bound")
    )
)]
#[axum::debug_handler]
pub async fn top_customers(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DateRangeQuery>,
) -> Result<impl IntoResponse> {
    let range = query.resolve()?;
    let ranking = state.analytics_service.top_customers(&range).await?;
    Ok(Json(TopCustomersResponse::new(ranking, &range)))
}

#[utoipa::path(
    get,
    path = "/api/analytics/top-products/",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Five best-selling products by units", body = Json<TopProductsResponse>),
        (status = 400, description = "Unparseable date bound")
    )
)]
#[axum::debug_handler]
pub async fn top_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DateRangeQuery>,
) -> Result<impl IntoResponse> {
    let range = query.resolve()?;
    let ranking = state.analytics_service.top_products(&range).await?;
    Ok(Json(TopProductsResponse::new(ranking, &range)))
}
