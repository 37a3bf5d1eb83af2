use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::{MultipartError, MultipartRejection}},
    routing::{get, post},
};

use crate::{
    dto::foods::{AddFoodForm, FoodList, NewFood, RemoveFoodRequest},
    error::{AppError, AppResult},
    extract::ApiJson,
    middleware::auth::AuthUser,
    response::MessageResponse,
    services::food_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", get(list_foods))
        .route("/add", post(add_food))
        .route("/remove", post(remove_food))
}

#[utoipa::path(
    get,
    path = "/api/food/list",
    responses(
        (status = 200, description = "All foods, newest first", body = FoodList)
    ),
    tag = "Food"
)]
pub async fn list_foods(State(state): State<AppState>) -> AppResult<Json<FoodList>> {
    let resp = food_service::list_foods(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/food/add",
    request_body(content = AddFoodForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Food stored", body = MessageResponse),
        (status = 400, description = "Missing or invalid field", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Food"
)]
pub async fn add_food(
    State(state): State<AppState>,
    _user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<MessageResponse>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let food = read_food_form(&mut multipart).await?;
    let resp = food_service::add_food(&state, food).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/food/remove",
    request_body = RemoveFoodRequest,
    responses(
        (status = 200, description = "Food removed", body = MessageResponse),
        (status = 404, description = "Unknown food", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Food"
)]
pub async fn remove_food(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiJson(payload): ApiJson<RemoveFoodRequest>,
) -> AppResult<Json<MessageResponse>> {
    let resp = food_service::remove_food(&state, payload.id).await?;
    Ok(Json(resp))
}

async fn read_food_form(multipart: &mut Multipart) -> AppResult<NewFood> {
    let mut name = None;
    let mut description = None;
    let mut price = None;
    let mut category = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = Some(field.text().await.map_err(bad_form)?),
            "description" => description = Some(field.text().await.map_err(bad_form)?),
            "price" => price = Some(field.text().await.map_err(bad_form)?),
            "category" => category = Some(field.text().await.map_err(bad_form)?),
            "image" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let bytes = field.bytes().await.map_err(bad_form)?;
                image = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let text = |value: Option<String>, field: &str| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
    };

    let name = text(name, "name")?;
    let description = text(description, "description")?;
    let category = text(category, "category")?;
    let price = text(price, "price")?
        .parse::<i64>()
        .ok()
        .filter(|p| *p >= 0)
        .ok_or_else(|| AppError::BadRequest("price must be a non-negative integer".into()))?;
    let (image_name, image) = image
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or_else(|| AppError::BadRequest("image is required".into()))?;

    Ok(NewFood {
        name,
        description,
        price,
        category,
        image_name,
        image,
    })
}

fn bad_form(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}
