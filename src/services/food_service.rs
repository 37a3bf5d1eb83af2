use std::path::Path;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use tokio::fs;
use uuid::Uuid;

use crate::{
    dto::foods::{FoodList, NewFood},
    entity::foods::{ActiveModel as FoodActive, Column as FoodCol, Entity as Foods, Model as FoodModel},
    error::{AppError, AppResult},
    models::Food,
    response::MessageResponse,
    state::AppState,
};

pub async fn list_foods(state: &AppState) -> AppResult<FoodList> {
    let data = Foods::find()
        .order_by_desc(FoodCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(food_from_entity)
        .collect();

    Ok(FoodList {
        success: true,
        data,
    })
}

pub async fn add_food(state: &AppState, food: NewFood) -> AppResult<MessageResponse> {
    let now = Utc::now();
    let image = format!("{}_{}", now.timestamp_millis(), sanitize_file_name(&food.image_name));
    let path = state.upload_dir.join(&image);

    fs::create_dir_all(&state.upload_dir)
        .await
        .map_err(anyhow::Error::from)?;
    fs::write(&path, &food.image)
        .await
        .map_err(anyhow::Error::from)?;

    let inserted = FoodActive {
        id: Set(Uuid::new_v4()),
        name: Set(food.name),
        description: Set(food.description),
        price: Set(food.price),
        category: Set(food.category),
        image: Set(image),
        created_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await;

    let saved = match inserted {
        Ok(saved) => saved,
        Err(err) => {
            remove_image(&path).await;
            return Err(err.into());
        }
    };

    tracing::info!(food_id = %saved.id, image = %saved.image, "food added");
    Ok(MessageResponse::ok("Food Added"))
}

pub async fn remove_food(state: &AppState, id: Uuid) -> AppResult<MessageResponse> {
    let food = Foods::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Foods::delete_by_id(food.id).exec(&state.orm).await?;
    remove_image(&state.upload_dir.join(&food.image)).await;

    tracing::info!(food_id = %food.id, "food removed");
    Ok(MessageResponse::ok("Food Removed"))
}

/// Keep only the final path component, restricted to a safe character set.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

async fn remove_image(path: &Path) {
    if let Err(err) = fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(error = %err, path = %path.display(), "failed to remove image");
        }
    }
}

fn food_from_entity(model: FoodModel) -> Food {
    Food {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category: model.category,
        image: model.image,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
