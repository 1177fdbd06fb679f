use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    dto::auth_dto::{TokenObtainPayload, TokenPairResponse, TokenRefreshPayload},
    error::Result,
    extract::ValidatedJson,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/token/",
    request_body = TokenObtainPayload,
    responses(
        (status = 200, description = "Access and refresh tokens", body = Json<TokenPairResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TokenObtainPayload>,
) -> Result<impl IntoResponse> {
    let pair = state
        .auth_service
        .obtain(&payload.username, &payload.password)
        .await?;
    Ok(Json(pair))
}

#[utoipa::path(
    post,
    path = "/api/token/refresh/",
    request_body = TokenRefreshPayload,
    responses(
        (status = 200, description = "Rotated token pair", body = Json<TokenPairResponse>),
        (status = 401, description = "Refresh token invalid, expired or already used")
    )
)]
#[axum::debug_handler]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TokenRefreshPayload>,
) -> Result<impl IntoResponse> {
    let pair = state.auth_service.refresh(&payload.refresh).await?;
    Ok(Json(pair))
}
