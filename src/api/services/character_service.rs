use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::AppError;
use crate::storage::entities::characters;
use crate::storage::{CharacterInput, CharacterRepository, SeaOrmBackend};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterPayload {
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
    pub name: String,
    pub title: Option<String>,
    pub age: Option<String>,
    pub occupation: Option<String>,
    pub team: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub relationships: Vec<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CharacterResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    pub title: Option<String>,
    pub age: Option<String>,
    pub occupation: Option<String>,
    pub team: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    pub abilities: Vec<String>,
    pub relationships: Vec<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub id: i32,
    pub message: String,
}

impl From<characters::Model> for CharacterResponse {
    fn from(model: characters::Model) -> Self {
        // 存储层持有 JSON array 字符串，响应前解析回字符串列表
        let abilities =
            serde_json::from_str(model.abilities.as_deref().unwrap_or("[]")).unwrap_or_default();
        let relationships = serde_json::from_str(model.relationships.as_deref().unwrap_or("[]"))
            .unwrap_or_default();

        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            title: model.title,
            age: model.age,
            occupation: model.occupation,
            team: model.team,
            personality: model.personality,
            background: model.background,
            abilities,
            relationships,
            image_url: model.image_url,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

impl From<CharacterPayload> for CharacterInput {
    fn from(payload: CharacterPayload) -> Self {
        Self {
            user_id: payload.user_id,
            name: payload.name,
            title: payload.title,
            age: payload.age,
            occupation: payload.occupation,
            team: payload.team,
            personality: payload.personality,
            background: payload.background,
            abilities: payload.abilities,
            relationships: payload.relationships,
            image_url: payload.image_url,
        }
    }
}

/// GET /api/characters
/// 公共角色 + 指定用户的角色
pub async fn list(
    query: web::Query<ListQuery>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let rows = storage.list_characters(query.user_id).await?;

    let response: Vec<CharacterResponse> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/characters/{id}
pub async fn get(
    id: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let row = storage
        .find_character(*id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(CharacterResponse::from(row)))
}

/// POST /api/characters
pub async fn create(
    payload: web::Json<CharacterPayload>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Character name is required".into()));
    }

    let row = storage.create_character(payload.into()).await?;

    tracing::info!("Character created: {} (id: {})", row.name, row.id);

    Ok(HttpResponse::Created().json(MutationResponse {
        id: row.id,
        message: "Character created successfully".to_string(),
    }))
}

/// PUT /api/characters/{id}
pub async fn update(
    id: web::Path<i32>,
    payload: web::Json<CharacterPayload>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Character name is required".into()));
    }

    let row = storage.update_character(*id, payload.into()).await?;

    Ok(HttpResponse::Ok().json(MutationResponse {
        id: row.id,
        message: "Character updated successfully".to_string(),
    }))
}

/// DELETE /api/characters/{id}
pub async fn delete(
    id: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    storage.delete_character(*id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Character deleted successfully",
    })))
}
