use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Food;

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodList {
    pub success: bool,
    pub data: Vec<Food>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveFoodRequest {
    pub id: Uuid,
}

/// Validated fields of a multipart food upload.
#[derive(Debug)]
pub struct NewFood {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    pub image_name: String,
    pub image: Vec<u8>,
}

/// Multipart form accepted by `POST /api/food/add`, for the OpenAPI document.
#[derive(ToSchema)]
pub struct AddFoodForm {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}
