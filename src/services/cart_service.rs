use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    dto::cart::CartResponse,
    entity::{
        foods::Entity as Foods,
        users::{ActiveModel as UserActive, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartData,
    response::MessageResponse,
    state::AppState,
};

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    item_id: Option<String>,
) -> AppResult<MessageResponse> {
    let item_id = required_item(item_id)?;

    let food_id = Uuid::parse_str(&item_id).map_err(|_| AppError::NotFound)?;
    if Foods::find_by_id(food_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let account = load_user(state, user).await?;
    let mut cart = cart_of(&account)?;
    let quantity = cart.entry(item_id).or_insert(0);
    *quantity = quantity.saturating_add(1);
    save_cart(state, account, &cart).await?;

    Ok(MessageResponse::ok("Added To Cart"))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    item_id: Option<String>,
) -> AppResult<MessageResponse> {
    let item_id = required_item(item_id)?;

    let account = load_user(state, user).await?;
    let mut cart = cart_of(&account)?;
    if let Some(quantity) = cart.get(&item_id).copied() {
        if quantity > 1 {
            cart.insert(item_id, quantity - 1);
        } else {
            cart.remove(&item_id);
        }
        save_cart(state, account, &cart).await?;
    }

    Ok(MessageResponse::ok("Removed From Cart"))
}

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<CartResponse> {
    let account = load_user(state, user).await?;
    Ok(CartResponse {
        success: true,
        cart_data: cart_of(&account)?,
    })
}

fn required_item(item_id: Option<String>) -> AppResult<String> {
    item_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("itemId is required".into()))
}

// A valid token for a deleted account is treated like any other bad credential.
async fn load_user(state: &AppState, user: &AuthUser) -> AppResult<UserModel> {
    Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)
}

fn cart_of(user: &UserModel) -> AppResult<CartData> {
    let cart = serde_json::from_value(user.cart_data.clone()).map_err(anyhow::Error::from)?;
    Ok(cart)
}

async fn save_cart(state: &AppState, user: UserModel, cart: &CartData) -> AppResult<()> {
    let cart_data = serde_json::to_value(cart).map_err(anyhow::Error::from)?;
    let mut active: UserActive = user.into();
    active.cart_data = Set(cart_data);
    active.update(&state.orm).await?;
    Ok(())
}
