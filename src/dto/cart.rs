use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CartData;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub item_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub cart_data: CartData,
}
