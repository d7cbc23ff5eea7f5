use migration::Migrator;
use sea_orm::sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::errors::AppError;

/// 连接 SQLite 数据库（带自动创建和性能优化）
pub async fn connect_sqlite(config: &DatabaseConfig) -> Result<DatabaseConnection, AppError> {
    let opt = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::Internal(format!("SQLite URL 解析失败: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5))
        .pragma("cache_size", "-64000") // 64MB cache
        .pragma("temp_store", "memory");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_with(opt)
        .await
        .map_err(|e| AppError::Internal(format!("无法连接到 SQLite 数据库: {}", e)))?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 连接数据库
///
/// 单机部署，只支持 SQLite。
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, AppError> {
    if config.url.starts_with("sqlite://") || config.url.starts_with("sqlite:") {
        tracing::info!("使用 SQLite 数据库（已启用 WAL）");
        connect_sqlite(config).await
    } else {
        Err(AppError::Config(format!(
            "不支持的数据库类型: {}",
            config.url
        )))
    }
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), AppError> {
    Migrator::up(db).await?;

    tracing::info!("✓ Database migrations completed");
    Ok(())
}
