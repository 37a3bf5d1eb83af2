use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    gateway::GatewayOrder,
    models::{DeliveryAddress, Order, OrderLine},
};

/// Order contents as sent by the checkout page.
#[derive(Debug, Deserialize, ToSchema, Default, Clone)]
pub struct OrderPayload {
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub amount: Option<i64>,
    pub address: Option<DeliveryAddress>,
}

#[derive(Debug, Deserialize, ToSchema, Default)]
pub struct CreateGatewayOrderRequest {
    pub amount: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Default)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    #[serde(flatten)]
    pub order: OrderPayload,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GatewayOrderResponse {
    pub success: bool,
    pub order: GatewayOrder,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub success: bool,
    pub orders: Vec<Order>,
}
