use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    errors::{AppError, Result},
    routes::MessageResponse,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderSignupResponse {
    user: ProviderUser,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
}

/// Register a new user.
///
/// Credentials are created with the external identity provider; this
/// service stores the mirrored identity row and the initial profile.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username cannot be empty".to_string()));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }

    let username_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
    )
    .bind(username)
    .fetch_one(&state.pool)
    .await?;

    if username_taken {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let email_taken =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(payload.email.trim())
            .fetch_one(&state.pool)
            .await?;

    if email_taken {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    // Create the credential with the identity provider
    let signup_response = state
        .http
        .post(format!("{}/auth/v1/signup", state.config.auth_provider.base_url))
        .header("apikey", &state.config.auth_provider.api_key)
        .json(&json!({
            "email": payload.email.trim(),
            "password": payload.password,
        }))
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Auth provider call failed: {}", e)))?;

    if !signup_response.status().is_success() {
        let error_text = signup_response.text().await.unwrap_or_default();
        return Err(AppError::BadRequest(format!(
            "Failed to register user: {}",
            error_text
        )));
    }

    let signup: ProviderSignupResponse = signup_response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to parse auth provider response: {}", e)))?;

    let user_id = Uuid::parse_str(&signup.user.id)
        .map_err(|e| AppError::Internal(format!("Invalid UUID from auth provider: {}", e)))?;

    // Identity row and initial profile land together
    let mut tx = state.pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, first_name, last_name)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(username)
    .bind(payload.email.trim())
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO user_profiles (user_id, phone, description)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(payload.phone.as_deref())
    .bind(payload.description.as_deref().unwrap_or(""))
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(%user_id, username, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registration successful")),
    ))
}
