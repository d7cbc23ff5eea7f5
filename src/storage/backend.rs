use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use std::sync::Arc;

use super::entities::{prelude::*, *};
use super::repository::*;
use crate::errors::AppError;

/// SeaORM 存储后端
///
/// 生命周期归启动例程所有，按引用传给 API 层。
pub struct SeaOrmBackend {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmBackend {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 把唯一约束冲突归类为业务错误，其余照常上抛
    fn classify_unique(err: DbErr, message: &str) -> AppError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::BadRequest(message.into()),
            _ => AppError::Database(err),
        }
    }

    fn encode_list(items: &[String]) -> Result<String, AppError> {
        serde_json::to_string(items)
            .map_err(|e| AppError::Internal(format!("JSON encode failed: {}", e)))
    }

    /// 公共行 + 指定用户的行
    fn visibility<C: ColumnTrait>(column: C, viewer: Option<i32>) -> Condition {
        let mut cond = Condition::any().add(column.is_null());
        if let Some(user_id) = viewer {
            cond = cond.add(column.eq(user_id));
        }
        cond
    }
}

#[async_trait]
impl UserRepository for SeaOrmBackend {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<users::Model, AppError> {
        let user = users::ActiveModel {
            username: Set(username.to_string()),
            password: Set(password_hash.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        user.insert(self.db.as_ref())
            .await
            .map_err(|e| Self::classify_unique(e, "Username already exists"))
    }

    async fn find_user(&self, id: i32) -> Result<Option<users::Model>, AppError> {
        let user = Users::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, AppError> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?;
        Ok(user)
    }

    async fn count_characters(&self, user_id: i32) -> Result<u64, AppError> {
        let count = Characters::find()
            .filter(characters::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }

    async fn count_settings(&self, user_id: i32) -> Result<u64, AppError> {
        let count = Settings::find()
            .filter(settings::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl CharacterRepository for SeaOrmBackend {
    async fn list_characters(
        &self,
        viewer: Option<i32>,
    ) -> Result<Vec<characters::Model>, AppError> {
        let rows = Characters::find()
            .filter(Self::visibility(characters::Column::UserId, viewer))
            .order_by_desc(characters::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    async fn find_character(&self, id: i32) -> Result<Option<characters::Model>, AppError> {
        let row = Characters::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(row)
    }

    async fn create_character(
        &self,
        input: CharacterInput,
    ) -> Result<characters::Model, AppError> {
        let row = characters::ActiveModel {
            user_id: Set(input.user_id),
            name: Set(input.name),
            title: Set(input.title),
            age: Set(input.age),
            occupation: Set(input.occupation),
            team: Set(input.team),
            personality: Set(input.personality),
            background: Set(input.background),
            abilities: Set(Some(Self::encode_list(&input.abilities)?)),
            relationships: Set(Some(Self::encode_list(&input.relationships)?)),
            image_url: Set(input.image_url),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let row = row.insert(self.db.as_ref()).await?;
        Ok(row)
    }

    async fn update_character(
        &self,
        id: i32,
        input: CharacterInput,
    ) -> Result<characters::Model, AppError> {
        let existing = Characters::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: characters::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.title = Set(input.title);
        active.age = Set(input.age);
        active.occupation = Set(input.occupation);
        active.team = Set(input.team);
        active.personality = Set(input.personality);
        active.background = Set(input.background);
        active.abilities = Set(Some(Self::encode_list(&input.abilities)?));
        active.relationships = Set(Some(Self::encode_list(&input.relationships)?));

        // 未上传新图片时保留原有图片
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }

        let row = active.update(self.db.as_ref()).await?;
        Ok(row)
    }

    async fn delete_character(&self, id: i32) -> Result<(), AppError> {
        let result = Characters::delete_by_id(id).exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl SettingRepository for SeaOrmBackend {
    async fn list_settings(&self, viewer: Option<i32>) -> Result<Vec<settings::Model>, AppError> {
        let rows = Settings::find()
            .filter(Self::visibility(settings::Column::UserId, viewer))
            .order_by_desc(settings::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    async fn find_setting(&self, id: i32) -> Result<Option<settings::Model>, AppError> {
        let row = Settings::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(row)
    }

    async fn create_setting(&self, input: SettingInput) -> Result<settings::Model, AppError> {
        let row = settings::ActiveModel {
            user_id: Set(input.user_id),
            title: Set(input.title),
            description: Set(input.description),
            details: Set(Some(Self::encode_list(&input.details)?)),
            icon: Set(input.icon.unwrap_or_else(|| "fas fa-cog".to_string())),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        row.insert(self.db.as_ref())
            .await
            .map_err(|e| Self::classify_unique(e, "Setting title already exists"))
    }

    async fn update_setting(
        &self,
        id: i32,
        input: SettingInput,
    ) -> Result<settings::Model, AppError> {
        let existing = Settings::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: settings::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.description = Set(input.description);
        active.details = Set(Some(Self::encode_list(&input.details)?));
        if let Some(icon) = input.icon {
            active.icon = Set(icon);
        }

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| Self::classify_unique(e, "Setting title already exists"))
    }

    async fn delete_setting(&self, id: i32) -> Result<(), AppError> {
        let result = Settings::delete_by_id(id).exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
