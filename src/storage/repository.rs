use async_trait::async_trait;

use super::entities::{characters, settings, users};
use crate::errors::AppError;

/// 角色写入载荷
#[derive(Debug, Clone, Default)]
pub struct CharacterInput {
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
    /// None 表示保留原有图片
    pub image_url: Option<String>,
}

/// 设定写入载荷
#[derive(Debug, Clone, Default)]
pub struct SettingInput {
    pub user_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub details: Vec<String>,
    pub icon: Option<String>,
}

/// 用户仓储
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<users::Model, AppError>;
    async fn find_user(&self, id: i32) -> Result<Option<users::Model>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, AppError>;
    async fn count_characters(&self, user_id: i32) -> Result<u64, AppError>;
    async fn count_settings(&self, user_id: i32) -> Result<u64, AppError>;
}

/// 角色仓储
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// 公共角色 + 指定用户的角色，按创建时间倒序
    async fn list_characters(&self, viewer: Option<i32>)
    -> Result<Vec<characters::Model>, AppError>;
    async fn find_character(&self, id: i32) -> Result<Option<characters::Model>, AppError>;
    async fn create_character(&self, input: CharacterInput)
    -> Result<characters::Model, AppError>;
    async fn update_character(
        &self,
        id: i32,
        input: CharacterInput,
    ) -> Result<characters::Model, AppError>;
    async fn delete_character(&self, id: i32) -> Result<(), AppError>;
}

/// 设定仓储
#[async_trait]
pub trait SettingRepository: Send + Sync {
    async fn list_settings(&self, viewer: Option<i32>) -> Result<Vec<settings::Model>, AppError>;
    async fn find_setting(&self, id: i32) -> Result<Option<settings::Model>, AppError>;
    async fn create_setting(&self, input: SettingInput) -> Result<settings::Model, AppError>;
    async fn update_setting(
        &self,
        id: i32,
        input: SettingInput,
    ) -> Result<settings::Model, AppError>;
    async fn delete_setting(&self, id: i32) -> Result<(), AppError>;
}
