use std::sync::LazyLock;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    dto::auth::{AuthResponse, LoginRequest, RegisterRequest},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::UserProfile,
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;

// Verified against when the email is unknown so both login failures cost one hash check.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("not-a-real-password").ok());

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<AuthResponse> {
    let (name, email, password) = match (
        present(payload.name),
        present(payload.email),
        payload.password.filter(|p| !p.is_empty()),
    ) {
        (Some(name), Some(email), Some(password)) => (name, normalize_email(&email), password),
        _ => {
            return Err(AppError::BadRequest(
                "Name, email, and password are required.".into(),
            ));
        }
    };

    let exist = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict("User already exists.".into()));
    }

    if !email.validate_email() {
        return Err(AppError::BadRequest("Please enter a valid email.".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }

    let password_hash = hash_password(&password)?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        cart_data: Set(serde_json::json!({})),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| match err.sql_err() {
        // Lost a race against a concurrent registration.
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("User already exists.".into())
        }
        _ => AppError::OrmError(err),
    })?;

    tracing::info!(user_id = %user.id, "user registered");

    let token = state.jwt.issue(user.id)?;
    Ok(AuthResponse {
        success: true,
        token,
        user: profile(&user),
    })
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<AuthResponse> {
    let (email, password) = match (
        present(payload.email),
        payload.password.filter(|p| !p.is_empty()),
    ) {
        (Some(email), Some(password)) => (normalize_email(&email), password),
        _ => {
            return Err(AppError::BadRequest(
                "Email and password are required.".into(),
            ));
        }
    };

    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(&password, dummy);
            }
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "user logged in");

    let token = state.jwt.issue(user.id)?;
    Ok(AuthResponse {
        success: true,
        token,
        user: profile(&user),
    })
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn profile(user: &UserModel) -> UserProfile {
    UserProfile {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
