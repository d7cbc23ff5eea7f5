use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::AppError;
use crate::storage::entities::settings;
use crate::storage::{SeaOrmBackend, SettingInput, SettingRepository};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SettingPayload {
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub details: Vec<String>,
    pub icon: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub id: i32,
    pub message: String,
}

impl From<settings::Model> for SettingResponse {
    fn from(model: settings::Model) -> Self {
        // 存储层持有 JSON array 字符串，响应前解析回字符串列表
        let details =
            serde_json::from_str(model.details.as_deref().unwrap_or("[]")).unwrap_or_default();

        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            details,
            icon: model.icon,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

impl From<SettingPayload> for SettingInput {
    fn from(payload: SettingPayload) -> Self {
        Self {
            user_id: payload.user_id,
            title: payload.title,
            description: payload.description,
            details: payload.details,
            icon: payload.icon,
        }
    }
}

/// GET /api/settings
/// 公共设定 + 指定用户的设定
pub async fn list(
    query: web::Query<ListQuery>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let rows = storage.list_settings(query.user_id).await?;

    let response: Vec<SettingResponse> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/settings/{id}
pub async fn get(
    id: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let row = storage.find_setting(*id).await?.ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(SettingResponse::from(row)))
}

/// POST /api/settings
pub async fn create(
    payload: web::Json<SettingPayload>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Setting title is required".into()));
    }

    let row = storage.create_setting(payload.into()).await?;

    tracing::info!("Setting created: {} (id: {})", row.title, row.id);

    Ok(HttpResponse::Created().json(MutationResponse {
        id: row.id,
        message: "Setting created successfully".to_string(),
    }))
}

/// PUT /api/settings/{id}
pub async fn update(
    id: web::Path<i32>,
    payload: web::Json<SettingPayload>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Setting title is required".into()));
    }

    let row = storage.update_setting(*id, payload.into()).await?;

    Ok(HttpResponse::Ok().json(MutationResponse {
        id: row.id,
        message: "Setting updated successfully".to_string(),
    }))
}

/// DELETE /api/settings/{id}
pub async fn delete(
    id: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    storage.delete_setting(*id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Setting deleted successfully",
    })))
}
