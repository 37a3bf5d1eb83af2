use chrono::Utc;
use food_order_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        foods::{ActiveModel as FoodActive, Column as FoodCol, Entity as Foods},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    services::auth_service::hash_password,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let user_id = ensure_user(&orm, "Demo User", "user@example.com", "user12345").await?;
    seed_foods(&orm).await?;

    println!("Seed completed. User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        cart_data: Set(serde_json::json!({})),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    println!("Created user {email}");
    Ok(user.id)
}

async fn seed_foods(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let foods = vec![
        ("Greek salad", "Feta, olives and crisp cucumber", 12, "Salad", "food_1.png"),
        ("Veg rolls", "Spiced vegetables in a flaky wrap", 15, "Rolls", "food_5.png"),
        ("Chicken sandwich", "Grilled chicken with slaw", 24, "Sandwich", "food_13.png"),
        ("Cup cake", "Vanilla sponge with buttercream", 14, "Cake", "food_17.png"),
        ("Garlic noodles", "Wok tossed with chilli and garlic", 16, "Noodles", "food_29.png"),
    ];

    for (name, description, price, category, image) in foods {
        let exists = Foods::find()
            .filter(FoodCol::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        FoodActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
            category: Set(category.to_string()),
            image: Set(image.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded foods");
    Ok(())
}
