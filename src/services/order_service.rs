use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        CreateGatewayOrderRequest, GatewayOrderResponse, OrderList, OrderPayload,
        VerifyPaymentRequest,
    },
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    gateway::to_minor_units,
    middleware::auth::AuthUser,
    models::{DeliveryAddress, Order, OrderLine},
    response::MessageResponse,
    state::AppState,
};

const DEFAULT_CURRENCY: &str = "INR";

/// An order payload that passed validation.
#[derive(Debug, Clone)]
pub struct ValidOrder {
    pub items: Vec<OrderLine>,
    pub amount: i64,
    pub address: DeliveryAddress,
}

/// Gateway identifiers of a payment whose signature has been checked.
#[derive(Debug, Clone)]
pub struct VerifiedPayment {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
}

pub fn validate_order(payload: OrderPayload) -> AppResult<ValidOrder> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order must contain at least one item".into()));
    }
    for item in &payload.items {
        if item.name.trim().is_empty() {
            return Err(AppError::BadRequest("Every item needs a name".into()));
        }
        if item.price < 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid price for item {}",
                item.name
            )));
        }
        if item.quantity == 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for item {}",
                item.name
            )));
        }
    }

    let amount = match payload.amount {
        Some(amount) if amount > 0 => amount,
        _ => return Err(AppError::BadRequest("Amount is required".into())),
    };

    let address = match payload.address {
        Some(address) if !address.street.trim().is_empty() => address,
        _ => return Err(AppError::BadRequest("Delivery address is required".into())),
    };

    Ok(ValidOrder {
        items: payload.items,
        amount,
        address,
    })
}

/// Unverified placement: the order is stored unpaid and the cart is emptied.
pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    payload: OrderPayload,
) -> AppResult<MessageResponse> {
    let order = validate_order(payload)?;

    let saved = insert_order(&state.orm, user.user_id, order, None).await?;
    clear_cart(&state.orm, user.user_id).await?;

    tracing::info!(user_id = %user.user_id, order_id = %saved.id, "order placed");
    Ok(MessageResponse::ok("Order placed successfully"))
}

pub async fn create_gateway_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateGatewayOrderRequest,
) -> AppResult<GatewayOrderResponse> {
    let payments = state.payments()?;

    let amount = match payload.amount {
        Some(amount) if amount > 0 => amount,
        _ => return Err(AppError::BadRequest("Amount is required".into())),
    };
    if to_minor_units(amount).is_none() {
        return Err(AppError::BadRequest("Amount is too large".into()));
    }

    let currency = payload
        .currency
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let receipt = format!("receipt_order_{}", Utc::now().timestamp_millis());

    let order = payments.create_order(amount, &currency, &receipt).await?;

    tracing::info!(user_id = %user.user_id, gateway_order_id = %order.id, "gateway order created");
    Ok(GatewayOrderResponse {
        success: true,
        order,
    })
}

/// Persist a paid order only after the gateway signature checks out.
pub async fn verify_payment(
    state: &AppState,
    user: &AuthUser,
    payload: VerifyPaymentRequest,
) -> AppResult<MessageResponse> {
    let payments = state.payments()?;

    let (order_id, payment_id, signature) = match (
        payload.razorpay_order_id.filter(|v| !v.is_empty()),
        payload.razorpay_payment_id.filter(|v| !v.is_empty()),
        payload.razorpay_signature.filter(|v| !v.is_empty()),
    ) {
        (Some(o), Some(p), Some(s)) => (o, p, s),
        _ => {
            return Err(AppError::BadRequest(
                "razorpay_order_id, razorpay_payment_id and razorpay_signature are required"
                    .into(),
            ));
        }
    };

    let order = validate_order(payload.order)?;

    if !payments.verify_payment(&order_id, &payment_id, &signature) {
        tracing::warn!(
            user_id = %user.user_id,
            gateway_order_id = %order_id,
            "payment signature mismatch"
        );
        return Err(AppError::BadRequest("Invalid payment signature".into()));
    }

    let replay = Orders::find()
        .filter(OrderCol::GatewayPaymentId.eq(payment_id.as_str()))
        .one(&state.orm)
        .await?;
    if replay.is_some() {
        return Err(AppError::Conflict("Payment already processed".into()));
    }

    let verified = VerifiedPayment {
        gateway_order_id: order_id,
        gateway_payment_id: payment_id,
    };
    let saved = insert_order(&state.orm, user.user_id, order, Some(verified)).await?;
    clear_cart(&state.orm, user.user_id).await?;

    tracing::info!(user_id = %user.user_id, order_id = %saved.id, "payment verified, order placed");
    Ok(MessageResponse::ok("Payment verified and order placed"))
}

pub async fn list_user_orders(state: &AppState, user: &AuthUser) -> AppResult<OrderList> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(OrderList {
        success: true,
        orders,
    })
}

/// The only writer of order rows. `payment` is true exactly when a verified payment is attached.
async fn insert_order<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    order: ValidOrder,
    verified: Option<VerifiedPayment>,
) -> AppResult<OrderModel> {
    let items = serde_json::to_value(&order.items).map_err(anyhow::Error::from)?;
    let address = serde_json::to_value(&order.address).map_err(anyhow::Error::from)?;
    let (gateway_order_id, gateway_payment_id) = match verified {
        Some(v) => (Some(v.gateway_order_id), Some(v.gateway_payment_id)),
        None => (None, None),
    };

    OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        items: Set(items),
        amount: Set(order.amount),
        address: Set(address),
        payment: Set(gateway_payment_id.is_some()),
        gateway_order_id: Set(gateway_order_id),
        gateway_payment_id: Set(gateway_payment_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Payment already processed".into())
        }
        _ => AppError::OrmError(err),
    })
}

pub(crate) async fn clear_cart<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<()> {
    let result = Users::update_many()
        .col_expr(UserCol::CartData, Expr::value(serde_json::json!({})))
        .filter(UserCol::Id.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        tracing::warn!(user_id = %user_id, "cart not cleared, user not found");
    }
    Ok(())
}

fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let items = serde_json::from_value(model.items).map_err(anyhow::Error::from)?;
    let address = serde_json::from_value(model.address).map_err(anyhow::Error::from)?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        items,
        amount: model.amount,
        address,
        payment: model.payment,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> OrderPayload {
        OrderPayload {
            items: vec![OrderLine {
                name: "Greek salad".into(),
                price: 12,
                quantity: 2,
            }],
            amount: Some(26),
            address: Some(DeliveryAddress {
                street: "1 Main St".into(),
                city: "Pune".into(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn accepts_complete_payload() {
        let order = validate_order(payload()).expect("valid order");
        assert_eq!(order.amount, 26);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn rejects_incomplete_payloads() {
        let mut empty = payload();
        empty.items.clear();
        assert!(matches!(validate_order(empty), Err(AppError::BadRequest(_))));

        let mut no_amount = payload();
        no_amount.amount = None;
        assert!(matches!(validate_order(no_amount), Err(AppError::BadRequest(_))));

        let mut zero_quantity = payload();
        zero_quantity.items[0].quantity = 0;
        assert!(matches!(validate_order(zero_quantity), Err(AppError::BadRequest(_))));

        let mut negative_price = payload();
        negative_price.items[0].price = -1;
        assert!(matches!(validate_order(negative_price), Err(AppError::BadRequest(_))));

        let mut no_address = payload();
        no_address.address = None;
        assert!(matches!(validate_order(no_address), Err(AppError::BadRequest(_))));
    }
}
