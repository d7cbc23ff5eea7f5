#[cfg(test)]
mod tests {
    use super::super::backend::SeaOrmBackend;
    use crate::errors::AppError;
    use crate::storage::seed::DEFAULT_SETTINGS;
    use crate::storage::{
        CharacterInput, CharacterRepository, SettingInput, SettingRepository, UserRepository,
        run_migrations, seed_defaults,
    };
    use sea_orm::{Database, DatabaseConnection};
    use std::sync::Arc;

    /// 创建测试用的内存数据库
    async fn setup_test_db() -> Arc<DatabaseConnection> {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        run_migrations(&db).await.expect("Failed to run migrations");

        Arc::new(db)
    }

    fn character_input(name: &str) -> CharacterInput {
        CharacterInput {
            name: name.to_string(),
            title: Some("이형사냥꾼".to_string()),
            age: Some("24".to_string()),
            abilities: vec!["검술".to_string(), "각성 능력".to_string()],
            relationships: vec!["동료: 유진".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_user_create_and_find() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db);

        let user = backend
            .create_user("tester", "hashed-password")
            .await
            .expect("Failed to create user");
        assert_eq!(user.username, "tester");

        let found = backend
            .find_by_username("tester")
            .await
            .expect("Lookup failed")
            .expect("User should exist");
        assert_eq!(found.id, user.id);

        assert!(
            backend
                .find_by_username("nobody")
                .await
                .expect("Lookup failed")
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_is_classified() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db);

        backend
            .create_user("tester", "hash1")
            .await
            .expect("First create failed");

        // 唯一约束冲突必须归类为 BadRequest，而不是裸数据库错误
        let result = backend.create_user("tester", "hash2").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_character_crud_roundtrip() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db);

        // 1. 创建
        let created = backend
            .create_character(character_input("수호"))
            .await
            .expect("Create failed");
        assert_eq!(created.name, "수호");
        let abilities: Vec<String> =
            serde_json::from_str(created.abilities.as_deref().unwrap()).unwrap();
        assert_eq!(abilities.len(), 2);

        // 2. 查询
        let fetched = backend
            .find_character(created.id)
            .await
            .expect("Find failed")
            .expect("Character should exist");
        assert_eq!(fetched.name, "수호");

        // 3. 修改
        let mut input = character_input("수호");
        input.team = Some("이형사냥꾼 1팀".to_string());
        let updated = backend
            .update_character(created.id, input)
            .await
            .expect("Update failed");
        assert_eq!(updated.team.as_deref(), Some("이형사냥꾼 1팀"));

        // 4. 删除后不可见
        backend
            .delete_character(created.id)
            .await
            .expect("Delete failed");
        assert!(
            backend
                .find_character(created.id)
                .await
                .expect("Find failed")
                .is_none()
        );

        // 5. 再删报 NotFound
        let result = backend.delete_character(created.id).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_character_update_keeps_image_when_absent() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db);

        let mut input = character_input("유진");
        input.image_url = Some("/uploads/yujin.png".to_string());
        let created = backend.create_character(input).await.expect("Create failed");

        // 不带 image_url 的修改保留原图
        let updated = backend
            .update_character(created.id, character_input("유진"))
            .await
            .expect("Update failed");
        assert_eq!(updated.image_url.as_deref(), Some("/uploads/yujin.png"));

        // 带 image_url 的修改覆盖
        let mut input = character_input("유진");
        input.image_url = Some("/uploads/yujin-v2.png".to_string());
        let updated = backend
            .update_character(created.id, input)
            .await
            .expect("Update failed");
        assert_eq!(updated.image_url.as_deref(), Some("/uploads/yujin-v2.png"));
    }

    #[tokio::test]
    async fn test_character_visibility_filter() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db);
        let user = backend.create_user("tester", "hash").await.unwrap();

        // 公共角色 + 用户角色
        backend
            .create_character(character_input("공용 캐릭터"))
            .await
            .expect("Create failed");
        let mut own = character_input("내 캐릭터");
        own.user_id = Some(user.id);
        backend.create_character(own).await.expect("Create failed");

        // 未登录只看到公共角色
        let anonymous = backend.list_characters(None).await.unwrap();
        assert_eq!(anonymous.len(), 1);

        // 登录用户看到公共 + 自己的
        let visible = backend.list_characters(Some(user.id)).await.unwrap();
        assert_eq!(visible.len(), 2);
    }

    #[tokio::test]
    async fn test_setting_crud_and_unique_title() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db);

        let input = SettingInput {
            title: "시간선".to_string(),
            description: Some("주요 사건 연표".to_string()),
            details: vec!["1차 침공: 10년 전".to_string()],
            ..Default::default()
        };
        let created = backend
            .create_setting(input.clone())
            .await
            .expect("Create failed");
        assert_eq!(created.icon, "fas fa-cog", "icon defaults when omitted");

        // 同名设定创建被归类为 BadRequest
        let duplicate = backend.create_setting(input).await;
        assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

        // 修改描述和图标
        let updated = backend
            .update_setting(
                created.id,
                SettingInput {
                    title: "시간선".to_string(),
                    description: Some("세계관 연표".to_string()),
                    details: vec!["1차 침공: 10년 전".to_string()],
                    icon: Some("fas fa-clock".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");
        assert_eq!(updated.description.as_deref(), Some("세계관 연표"));
        assert_eq!(updated.icon, "fas fa-clock");

        backend
            .delete_setting(created.id)
            .await
            .expect("Delete failed");
        let result = backend.delete_setting(created.id).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_per_user_counts() {
        let db = setup_test_db().await;
        let backend = SeaOrmBackend::new(db);
        let user = backend.create_user("tester", "hash").await.unwrap();

        let mut input = character_input("A");
        input.user_id = Some(user.id);
        backend.create_character(input).await.unwrap();
        let mut input = character_input("B");
        input.user_id = Some(user.id);
        backend.create_character(input).await.unwrap();

        backend
            .create_setting(SettingInput {
                user_id: Some(user.id),
                title: "개인 설정".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(backend.count_characters(user.id).await.unwrap(), 2);
        assert_eq!(backend.count_settings(user.id).await.unwrap(), 1);
    }

    /// 端到端：全新库 → 启动序列 → 恰好 5 条默认设定
    #[tokio::test]
    async fn test_startup_sequence_end_to_end() {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        // 模拟两次完整启动
        for _ in 0..2 {
            run_migrations(&db).await.expect("Migrations failed");
            seed_defaults(&db).await.expect("Seeding failed");
        }

        let backend = SeaOrmBackend::new(Arc::new(db));
        let rows = backend.list_settings(None).await.expect("List failed");

        assert_eq!(rows.len(), DEFAULT_SETTINGS.len());

        let mut titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        titles.sort_unstable();
        let mut expected: Vec<&str> = DEFAULT_SETTINGS.iter().map(|d| d.title).collect();
        expected.sort_unstable();
        assert_eq!(titles, expected);

        for row in &rows {
            let details: Vec<String> =
                serde_json::from_str(row.details.as_deref().unwrap_or("[]")).unwrap();
            assert!(!details.is_empty());
            assert!(row.icon.starts_with("fas fa-"));
        }
    }
}
