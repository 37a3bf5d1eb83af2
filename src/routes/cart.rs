use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::cart::{CartItemRequest, CartResponse},
    error::AppResult,
    extract::ApiJson,
    middleware::auth::AuthUser,
    response::MessageResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_to_cart))
        .route("/remove", post(remove_from_cart))
        .route("/get", post(get_cart))
}

#[utoipa::path(
    post,
    path = "/api/cart/add",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Quantity incremented", body = MessageResponse),
        (status = 404, description = "Unknown food item", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CartItemRequest>,
) -> AppResult<Json<MessageResponse>> {
    let resp = cart_service::add_to_cart(&state, &user, payload.item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/remove",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Quantity decremented", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CartItemRequest>,
) -> AppResult<Json<MessageResponse>> {
    let resp = cart_service::remove_from_cart(&state, &user, payload.item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/get",
    responses(
        (status = 200, description = "Cart of the caller", body = CartResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<CartResponse>> {
    let resp = cart_service::get_cart(&state, &user).await?;
    Ok(Json(resp))
}
