pub use sea_orm_migration::prelude::*;

use sea_orm_migration::sea_orm::DatabaseConnection;

mod ledger;
mod m20260801_000001_create_base_tables;
mod m20260801_000002_dedupe_setting_titles;
mod m20260801_000003_add_character_team;

pub use ledger::VersionLedger;

/// 迁移执行错误
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    // 版本账本自身无法创建，启动必须中止
    #[error("migration ledger bootstrap failed: {0}")]
    Bootstrap(#[source] DbErr),

    #[error("migration '{version}' failed: {source}")]
    StepFailed {
        version: &'static str,
        #[source]
        source: DbErr,
    },

    // 账本唯一约束命中：该版本已被记录过
    #[error("migration version already recorded: {0}")]
    DuplicateVersion(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

/// 单个迁移步骤
///
/// 结构变更必须自身幂等（if_not_exists / 列探测），
/// 账本只负责保证 `apply` 不会被执行第二次。
#[async_trait::async_trait]
pub trait MigrationStep: Send + Sync {
    /// 版本标签，在账本中唯一
    fn version(&self) -> &'static str;

    async fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr>;
}

pub struct Migrator;

impl Migrator {
    /// 按声明顺序返回全部迁移步骤
    pub fn steps() -> Vec<Box<dyn MigrationStep>> {
        vec![
            Box::new(m20260801_000001_create_base_tables::Migration),
            Box::new(m20260801_000002_dedupe_setting_titles::Migration),
            Box::new(m20260801_000003_add_character_team::Migration),
        ]
    }

    /// 应用所有未执行的迁移步骤
    pub async fn up(db: &DatabaseConnection) -> Result<(), MigrateError> {
        Self::run_steps(db, &Self::steps()).await
    }

    /// 依次执行给定步骤：已记录的跳过，失败的中止后续
    pub async fn run_steps(
        db: &DatabaseConnection,
        steps: &[Box<dyn MigrationStep>],
    ) -> Result<(), MigrateError> {
        let ledger = VersionLedger::prepare(db).await?;
        let manager = SchemaManager::new(db);

        for step in steps {
            let version = step.version();

            if ledger.has_applied(version).await? {
                tracing::debug!("migration '{}' already applied, skipping", version);
                continue;
            }

            tracing::info!("applying migration '{}'", version);
            step.apply(&manager)
                .await
                .map_err(|source| MigrateError::StepFailed { version, source })?;

            // apply 成功后才写账本；并发竞争下的重复记录视为已完成
            match ledger.record_applied(version).await {
                Ok(()) | Err(MigrateError::DuplicateVersion(_)) => {}
                Err(err) => return Err(err),
            }

            tracing::info!("migration '{}' completed", version);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectionTrait, Database};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn setup_db() -> DatabaseConnection {
        Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database")
    }

    /// 带执行计数的探针步骤
    struct CountingStep {
        hits: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl MigrationStep for CountingStep {
        fn version(&self) -> &'static str {
            "v_probe_counting"
        }

        async fn apply(&self, _manager: &SchemaManager<'_>) -> Result<(), DbErr> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// 必定失败的步骤
    struct FailingStep;

    #[async_trait::async_trait]
    impl MigrationStep for FailingStep {
        fn version(&self) -> &'static str {
            "v_probe_failing"
        }

        async fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
            // 引用不存在的表，制造结构性错误
            manager
                .get_connection()
                .execute_unprepared("DELETE FROM no_such_table")
                .await?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_repeated_up_records_each_version_once() {
        let db = setup_db().await;

        // 连续执行三次启动迁移
        for _ in 0..3 {
            Migrator::up(&db).await.expect("Migration run failed");
        }

        let ledger = VersionLedger::prepare(&db).await.expect("Ledger failed");
        let versions = ledger
            .applied_versions()
            .await
            .expect("Failed to read ledger");

        let declared: Vec<&str> = Migrator::steps().iter().map(|s| s.version()).collect();
        assert_eq!(versions, declared, "Ledger must equal the declared list");
    }

    #[tokio::test]
    async fn test_apply_body_runs_exactly_once() {
        let db = setup_db().await;
        let hits = Arc::new(AtomicUsize::new(0));

        let steps: Vec<Box<dyn MigrationStep>> =
            vec![Box::new(CountingStep { hits: hits.clone() })];

        Migrator::run_steps(&db, &steps).await.expect("First run failed");
        Migrator::run_steps(&db, &steps).await.expect("Second run failed");

        assert_eq!(hits.load(Ordering::SeqCst), 1, "apply must not rerun");
    }

    #[tokio::test]
    async fn test_failed_step_aborts_remaining_sequence() {
        let db = setup_db().await;
        let hits = Arc::new(AtomicUsize::new(0));

        let steps: Vec<Box<dyn MigrationStep>> = vec![
            Box::new(FailingStep),
            Box::new(CountingStep { hits: hits.clone() }),
        ];

        let result = Migrator::run_steps(&db, &steps).await;
        assert!(matches!(
            result,
            Err(MigrateError::StepFailed { version: "v_probe_failing", .. })
        ));

        // 后续步骤不得执行，失败的步骤不得入账
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        let ledger = VersionLedger::prepare(&db).await.expect("Ledger failed");
        assert!(!ledger.has_applied("v_probe_failing").await.unwrap());
        assert!(!ledger.has_applied("v_probe_counting").await.unwrap());
    }

    #[tokio::test]
    async fn test_ledger_duplicate_version_is_classified() {
        let db = setup_db().await;
        let ledger = VersionLedger::prepare(&db).await.expect("Ledger failed");

        assert!(!ledger.has_applied("v_probe_dup").await.unwrap());

        ledger.record_applied("v_probe_dup").await.expect("First insert failed");
        assert!(ledger.has_applied("v_probe_dup").await.unwrap());

        let second = ledger.record_applied("v_probe_dup").await;
        assert!(matches!(second, Err(MigrateError::DuplicateVersion(v)) if v == "v_probe_dup"));
    }

    #[tokio::test]
    async fn test_ledger_bootstrap_is_idempotent() {
        let db = setup_db().await;

        // 每次启动都会重建账本表，不得报错
        for _ in 0..3 {
            VersionLedger::prepare(&db).await.expect("Ledger bootstrap failed");
        }
    }

    #[tokio::test]
    async fn test_dedupe_keeps_lowest_id_per_title() {
        let db = setup_db().await;

        // 旧版结构：settings.title 尚无唯一约束
        db.execute_unprepared(
            "CREATE TABLE settings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                title TEXT NOT NULL,
                description TEXT,
                details TEXT,
                icon TEXT DEFAULT 'fas fa-cog',
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .await
        .expect("Failed to create legacy table");

        db.execute_unprepared(
            "INSERT INTO settings (title) VALUES ('A'), ('A'), ('B')",
        )
        .await
        .expect("Failed to insert duplicates");

        Migrator::up(&db).await.expect("Migration run failed");

        let stmt = Query::select()
            .columns([Alias::new("id"), Alias::new("title")])
            .from(Alias::new("settings"))
            .order_by(Alias::new("id"), Order::Asc)
            .to_owned();
        let rows = db
            .query_all(&stmt)
            .await
            .expect("Failed to query settings");

        let ids: Vec<i32> = rows
            .iter()
            .map(|row| row.try_get::<i32>("", "id").unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3], "Lowest id per title must survive");
    }

    #[tokio::test]
    async fn test_existing_team_column_is_benign() {
        let db = setup_db().await;

        // 全新数据库：建表阶段已包含 team 列，追加列步骤必须静默通过
        Migrator::up(&db).await.expect("First run failed");

        let manager = SchemaManager::new(&db);
        assert!(manager.has_column("characters", "team").await.unwrap());

        Migrator::up(&db).await.expect("Second run failed");
        assert!(manager.has_column("characters", "team").await.unwrap());
    }

    #[tokio::test]
    async fn test_team_column_added_to_legacy_table() {
        let db = setup_db().await;

        // 旧版 characters 表没有 team 列
        db.execute_unprepared(
            "CREATE TABLE characters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                name TEXT NOT NULL,
                title TEXT,
                age TEXT,
                occupation TEXT,
                personality TEXT,
                background TEXT,
                abilities TEXT,
                relationships TEXT,
                image_url TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .await
        .expect("Failed to create legacy table");

        let manager = SchemaManager::new(&db);
        assert!(!manager.has_column("characters", "team").await.unwrap());

        Migrator::up(&db).await.expect("Migration run failed");
        assert!(manager.has_column("characters", "team").await.unwrap());
    }
}
