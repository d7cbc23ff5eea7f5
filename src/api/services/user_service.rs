use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::get_config;
use crate::errors::AppError;
use crate::security::{Claims, JwtManager, PasswordManager};
use crate::storage::{SeaOrmBackend, UserRepository};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i32,
    pub username: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// 从请求扩展中提取 user_id（由 JwtAuth 中间件注入）
fn authenticated_user_id(req: &HttpRequest) -> Result<i32, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    claims
        .sub
        .parse()
        .map_err(|_| AppError::Internal("Invalid user_id in token".into()))
}

/// POST /api/users/register
pub async fn register(
    req: web::Json<RegisterRequest>,
    storage: web::Data<Arc<SeaOrmBackend>>,
    jwt_manager: web::Data<Arc<JwtManager>>,
) -> Result<HttpResponse, AppError> {
    // 1. 基本校验
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".into(),
        ));
    }
    if req.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".into(),
        ));
    }

    // 2. 验证用户名唯一性（竞争情况由存储层的唯一约束兜底）
    if storage.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::BadRequest("Username already exists".into()));
    }

    // 3. 加密密码并创建用户
    let password_hash = PasswordManager::hash_password(&req.password)?;
    let user = storage.create_user(&req.username, &password_hash).await?;

    // 4. 签发 Token
    let config = get_config();
    let token = jwt_manager.generate_token(user.id, &user.username, config.auth.token_expire)?;

    tracing::info!("User registered: {} (id: {})", user.username, user.id);

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User created successfully".to_string(),
        token,
        user: UserSummary {
            id: user.id,
            username: user.username,
        },
    }))
}

/// POST /api/users/login
pub async fn login(
    req: web::Json<LoginRequest>,
    storage: web::Data<Arc<SeaOrmBackend>>,
    jwt_manager: web::Data<Arc<JwtManager>>,
) -> Result<HttpResponse, AppError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    // 1. 查找用户
    let user = storage
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // 2. 验证密码
    if !PasswordManager::verify_password(&req.password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }

    // 3. 签发 Token
    let config = get_config();
    let token = jwt_manager.generate_token(user.id, &user.username, config.auth.token_expire)?;

    tracing::info!("User logged in: {} (id: {})", user.username, user.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: UserSummary {
            id: user.id,
            username: user.username,
        },
    }))
}

/// GET /api/users/profile
pub async fn get_profile(
    req: HttpRequest,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let user_id = authenticated_user_id(&req)?;

    let user = storage
        .find_user(user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        id: user.id,
        username: user.username,
        created_at: user.created_at.to_rfc3339(),
    }))
}

/// GET /api/users/characters/count
pub async fn character_count(
    req: HttpRequest,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let user_id = authenticated_user_id(&req)?;
    let count = storage.count_characters(user_id).await?;

    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/// GET /api/users/settings/count
pub async fn setting_count(
    req: HttpRequest,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let user_id = authenticated_user_id(&req)?;
    let count = storage.count_settings(user_id).await?;

    Ok(HttpResponse::Ok().json(CountResponse { count }))
}
