use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};

use super::entities::{prelude::*, settings};
use crate::errors::AppError;

/// 单条默认设定
pub struct DefaultSetting {
    pub title: &'static str,
    pub description: &'static str,
    pub details: &'static [&'static str],
    pub icon: &'static str,
}

/// 默认的世界观设定目录（user_id = NULL 的公用数据）
pub const DEFAULT_SETTINGS: &[DefaultSetting] = &[
    DefaultSetting {
        title: "마법 체계",
        description: "이형세계의 마법과 인간의 각성 능력에 대한 체계적인 설명",
        details: &[
            "신앙 마법: 인간의 믿음에서 비롯되는 신족의 힘",
            "이형 마법: 이형들이 사용하는 초자연적 능력",
            "각성 능력: 인간이 각성으로 얻는 특별한 힘",
            "기술 마법: 현대 기술과 마법의 결합",
        ],
        icon: "fas fa-magic",
    },
    DefaultSetting {
        title: "기술",
        description: "현실보다 한 단계 발전된 근미래 기술들",
        details: &[
            "양자 컴퓨터: 상용화된 고성능 컴퓨팅",
            "상온 초전도체: 에너지 효율성 극대화",
            "제한적 반중력: 일부 분야에서 활용",
            "이형 기술: 이형세계의 기술과의 융합",
        ],
        icon: "fas fa-microchip",
    },
    DefaultSetting {
        title: "도시 구조",
        description: "현실과 이형세계가 공존하는 도시의 구조",
        details: &[
            "표면 세계: 일반인들이 살아가는 평범한 도시",
            "이형 구역: 이형들이 은밀히 활동하는 지역",
            "각성자 거주지: 각성자들이 모여사는 특별 구역",
            "이형사냥꾼 본부: 이형 관리 조직의 거점",
        ],
        icon: "fas fa-city",
    },
    DefaultSetting {
        title: "위협 요소",
        description: "세계를 위협하는 다양한 위험 요소들",
        details: &[
            "이형의 침입: 이형세계에서 넘어오는 위협",
            "각성자 남용: 각성 능력을 악용하는 자들",
            "신앙 분쟁: 신족들 간의 경쟁과 갈등",
            "세계 멸망: 대규모 재앙의 위험",
        ],
        icon: "fas fa-skull",
    },
    DefaultSetting {
        title: "조직들",
        description: "세계의 균형을 유지하는 주요 조직들",
        details: &[
            "이형사냥꾼: 이형을 관리하는 전문 조직",
            "각성자 연합: 각성자들의 자조 단체",
            "신앙 관리국: 신앙 관련 정부 기관",
            "이형 연구소: 이형과 마법을 연구하는 기관",
        ],
        icon: "fas fa-users-cog",
    },
];

/// 写入默认设定数据
///
/// 逐行 insert-or-ignore（以 title 为自然键），不依赖迁移账本：
/// 重复启动不会产生重复行，个别默认行被手工删除后会在下次启动补回。
/// 单行失败即中止剩余批次；已插入的行不回滚，下次启动会重试。
pub async fn seed_defaults(db: &DatabaseConnection) -> Result<(), AppError> {
    let mut inserted = 0u32;

    for def in DEFAULT_SETTINGS {
        let details = serde_json::to_string(def.details)
            .map_err(|e| AppError::Internal(format!("Seed details encode failed: {}", e)))?;

        let row = settings::ActiveModel {
            user_id: Set(None),
            title: Set(def.title.to_string()),
            description: Set(Some(def.description.to_string())),
            details: Set(Some(details)),
            icon: Set(def.icon.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = Settings::insert(row)
            .on_conflict(
                OnConflict::column(settings::Column::Title)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            // 自然键已存在：无害跳过
            Err(DbErr::RecordNotInserted) => {
                tracing::debug!("default setting '{}' already present", def.title);
            }
            Err(source) => {
                return Err(AppError::Seed {
                    title: def.title.to_string(),
                    source,
                });
            }
        }
    }

    if inserted > 0 {
        tracing::info!("Seeded {} default setting(s)", inserted);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ColumnTrait, Database, PaginatorTrait, QueryFilter};

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        crate::storage::run_migrations(&db)
            .await
            .expect("Failed to run migrations");
        db
    }

    #[tokio::test]
    async fn test_seed_inserts_declared_count() {
        let db = setup_db().await;

        seed_defaults(&db).await.expect("Seeding failed");

        let count = Settings::find().count(&db).await.unwrap();
        assert_eq!(count, DEFAULT_SETTINGS.len() as u64);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = setup_db().await;

        // 连续播种三次，行数不变
        for _ in 0..3 {
            seed_defaults(&db).await.expect("Seeding failed");
        }

        let count = Settings::find().count(&db).await.unwrap();
        assert_eq!(count, DEFAULT_SETTINGS.len() as u64);
    }

    #[tokio::test]
    async fn test_seed_restores_missing_rows_only() {
        let db = setup_db().await;
        seed_defaults(&db).await.expect("Seeding failed");

        // 手工删掉两条默认行
        Settings::delete_many()
            .filter(settings::Column::Title.is_in(["기술", "조직들"]))
            .exec(&db)
            .await
            .expect("Failed to delete rows");
        assert_eq!(
            Settings::find().count(&db).await.unwrap(),
            DEFAULT_SETTINGS.len() as u64 - 2
        );

        // 再次播种只补缺失的 title，不重复已有的
        seed_defaults(&db).await.expect("Re-seeding failed");

        let count = Settings::find().count(&db).await.unwrap();
        assert_eq!(count, DEFAULT_SETTINGS.len() as u64);

        for def in DEFAULT_SETTINGS {
            let n = Settings::find()
                .filter(settings::Column::Title.eq(def.title))
                .count(&db)
                .await
                .unwrap();
            assert_eq!(n, 1, "title '{}' must appear exactly once", def.title);
        }
    }

    #[tokio::test]
    async fn test_seeded_rows_are_well_formed() {
        let db = setup_db().await;
        seed_defaults(&db).await.expect("Seeding failed");

        let rows = Settings::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), DEFAULT_SETTINGS.len());

        for row in rows {
            assert!(row.user_id.is_none(), "default rows are shared");
            assert!(!row.icon.is_empty());

            let details: Vec<String> =
                serde_json::from_str(row.details.as_deref().unwrap_or("[]")).unwrap();
            assert!(!details.is_empty(), "'{}' must have details", row.title);
        }
    }
}
