#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use food_order_api::{
    config::RazorpayConfig,
    db::create_schema,
    entity::foods::ActiveModel as FoodActive,
    gateway::RazorpayClient,
    jwt::JwtKeys,
    routes::create_app,
    state::AppState,
};
use hmac::{Hmac, Mac};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use secrecy::SecretString;
use serde_json::{Value, json};
use sha2::Sha256;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-jwt-secret";
pub const GATEWAY_KEY_ID: &str = "rzp_test_key";
pub const GATEWAY_SECRET: &str = "test-gateway-secret";
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

/// App with payments enabled against an unreachable gateway.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    build(Some(gateway_config("http://127.0.0.1:9/v1"))).await
}

pub async fn spawn_app_with_gateway(api_base: &str) -> anyhow::Result<TestApp> {
    build(Some(gateway_config(api_base))).await
}

pub async fn spawn_app_without_payments() -> anyhow::Result<TestApp> {
    build(None).await
}

pub fn gateway_config(api_base: &str) -> RazorpayConfig {
    RazorpayConfig {
        key_id: GATEWAY_KEY_ID.to_string(),
        key_secret: SecretString::from(GATEWAY_SECRET.to_string()),
        api_base: api_base.to_string(),
    }
}

async fn build(razorpay: Option<RazorpayConfig>) -> anyhow::Result<TestApp> {
    // One connection, otherwise every pooled connection sees its own empty in-memory database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let orm = Database::connect(options).await?;
    create_schema(&orm).await?;

    let state = AppState {
        orm,
        jwt: JwtKeys::new(&SecretString::from(JWT_SECRET.to_string())),
        payments: razorpay.as_ref().map(RazorpayClient::new).transpose()?,
        upload_dir: std::env::temp_dir().join(format!("food-order-api-test-{}", Uuid::new_v4())),
    };
    let router = create_app(state.clone(), &[ALLOWED_ORIGIN.to_string()]);

    Ok(TestApp { state, router })
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> anyhow::Result<(StatusCode, Bytes)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, body))
    }

    pub async fn post_raw(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> anyhow::Result<(StatusCode, Bytes)> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string()))?).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let (status, bytes) = self.post_raw(uri, token, body).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<(StatusCode, Bytes)> {
        self.send(Request::get(uri).body(Body::empty())?).await
    }

    /// Register and return `(token, user id)`.
    pub async fn register(&self, name: &str, email: &str) -> anyhow::Result<(String, Uuid)> {
        let (status, body) = self
            .post(
                "/api/user/register",
                None,
                json!({ "name": name, "email": email, "password": "password123" }),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        let token = body["token"].as_str().expect("token").to_string();
        let id = body["user"]["id"].as_str().expect("user id").parse()?;
        Ok((token, id))
    }

    pub async fn seed_food(&self, name: &str, price: i64) -> anyhow::Result<Uuid> {
        let food = FoodActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(format!("{name} description")),
            price: Set(price),
            category: Set("Salad".to_string()),
            image: Set(format!("{name}.png")),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.state.orm)
        .await?;
        Ok(food.id)
    }

    pub async fn cart(&self, token: &str) -> anyhow::Result<Value> {
        let (status, body) = self.post("/api/cart/get", Some(token), json!({})).await?;
        assert_eq!(status, StatusCode::OK, "cart fetch failed: {body}");
        Ok(body["cartData"].clone())
    }

    pub async fn orders(&self, token: &str) -> anyhow::Result<Vec<Value>> {
        let (status, body) = self
            .post("/api/order/user-orders", Some(token), json!({}))
            .await?;
        assert_eq!(status, StatusCode::OK, "order fetch failed: {body}");
        Ok(body["orders"].as_array().cloned().unwrap_or_default())
    }
}

pub fn order_body(items: &[(&str, i64, u32)], amount: i64) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|(name, price, quantity)| json!({ "name": name, "price": price, "quantity": quantity }))
        .collect();
    json!({
        "items": items,
        "amount": amount,
        "address": {
            "firstName": "Asha",
            "lastName": "Rao",
            "email": "asha@example.com",
            "street": "12 MG Road",
            "city": "Pune",
            "state": "MH",
            "zipcode": "411001",
            "country": "India",
            "phone": "9999999999"
        }
    })
}

/// Signature the gateway would hand to the checkout page.
pub fn gateway_signature(order_id: &str, payment_id: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(GATEWAY_SECRET.as_bytes()).expect("valid key length");
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Expected `cartData` holding a single item.
pub fn cart_with(item: Uuid, quantity: u32) -> Value {
    let mut cart = serde_json::Map::new();
    cart.insert(item.to_string(), json!(quantity));
    Value::Object(cart)
}
