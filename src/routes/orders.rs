use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::orders::{
        CreateGatewayOrderRequest, GatewayOrderResponse, OrderList, OrderPayload,
        VerifyPaymentRequest,
    },
    error::AppResult,
    extract::ApiJson,
    middleware::auth::AuthUser,
    response::MessageResponse,
    services::order_service,
    state::AppState,
};

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/place", post(place_order))
        .route("/razorpay/order", post(create_razorpay_order))
        .route("/razorpay/verify", post(verify_razorpay_payment))
        .route("/user-orders", post(user_orders))
}

#[utoipa::path(
    post,
    path = "/api/order/place",
    request_body = OrderPayload,
    responses(
        (status = 200, description = "Order stored unpaid, cart cleared", body = MessageResponse),
        (status = 400, description = "Invalid order", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<OrderPayload>,
) -> AppResult<Json<MessageResponse>> {
    let resp = order_service::place_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/order/razorpay/order",
    request_body = CreateGatewayOrderRequest,
    responses(
        (status = 200, description = "Gateway order created", body = GatewayOrderResponse),
        (status = 400, description = "Amount missing", body = MessageResponse),
        (status = 502, description = "Gateway failure", body = MessageResponse),
        (status = 503, description = "Payments not configured", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_razorpay_order(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CreateGatewayOrderRequest>,
) -> AppResult<Json<GatewayOrderResponse>> {
    let resp = order_service::create_gateway_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/order/razorpay/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 201, description = "Payment verified, paid order stored", body = MessageResponse),
        (status = 400, description = "Invalid signature or order", body = MessageResponse),
        (status = 409, description = "Payment already processed", body = MessageResponse),
        (status = 503, description = "Payments not configured", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn verify_razorpay_payment(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<VerifyPaymentRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let resp = order_service::verify_payment(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/order/user-orders",
    responses(
        (status = 200, description = "Orders of the caller, newest first", body = OrderList),
        (status = 401, description = "Missing or invalid token", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn user_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<OrderList>> {
    let resp = order_service::list_user_orders(&state, &user).await?;
    Ok(Json(resp))
}
