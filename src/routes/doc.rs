use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        cart::{CartItemRequest, CartResponse},
        foods::{AddFoodForm, FoodList, RemoveFoodRequest},
        orders::{
            CreateGatewayOrderRequest, GatewayOrderResponse, OrderList, OrderPayload,
            VerifyPaymentRequest,
        },
    },
    gateway::GatewayOrder,
    models::{DeliveryAddress, Food, Order, OrderLine, UserProfile},
    response::MessageResponse,
    routes::{cart, foods, health, orders, user},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "token_header",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        user::register,
        user::login,
        foods::list_foods,
        foods::add_food,
        foods::remove_food,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::get_cart,
        orders::place_order,
        orders::create_razorpay_order,
        orders::verify_razorpay_payment,
        orders::user_orders
    ),
    components(
        schemas(
            UserProfile,
            Order,
            OrderLine,
            DeliveryAddress,
            Food,
            GatewayOrder,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            CartItemRequest,
            CartResponse,
            AddFoodForm,
            FoodList,
            RemoveFoodRequest,
            OrderPayload,
            CreateGatewayOrderRequest,
            VerifyPaymentRequest,
            GatewayOrderResponse,
            OrderList,
            MessageResponse,
            health::HealthData
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "User", description = "Registration and login"),
        (name = "Food", description = "Food catalogue"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order placement and payment verification"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
