use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{AppConfig, get_config};
use crate::errors::AppError;
use crate::security::JwtManager;
use crate::storage::{connect, run_migrations, seed_defaults};

/// 服务器启动上下文
pub struct StartupContext {
    pub db: Arc<DatabaseConnection>,
    pub jwt_manager: Arc<JwtManager>,
    pub config: AppConfig,
    _log_guard: Option<WorkerGuard>,
}

/// 初始化服务器
///
/// 迁移与默认数据写入在此全部完成，HTTP 监听只在成功之后开始，
/// 请求不可能观察到半迁移状态。迁移失败直接中止启动（fail-fast）；
/// 播种失败仅记录日志，下次启动会自动补齐。
pub async fn prepare_server() -> Result<StartupContext, AppError> {
    let config = get_config().clone();

    // 1. 初始化日志
    let log_guard = crate::system::init_logging(&config.log);
    tracing::info!("lorekeeper v{} starting...", env!("CARGO_PKG_VERSION"));

    // 2. 验证配置
    config.validate()?;

    // 3. 初始化数据库
    tracing::info!("Connecting to database: {}", config.database.url);
    let db = connect(&config.database).await?;
    tracing::info!("Database connected");

    // 4. 运行数据库迁移
    tracing::info!("Running database migrations...");
    run_migrations(&db).await?;

    // 5. 写入默认数据
    match seed_defaults(&db).await {
        Ok(()) => tracing::info!("Default data ready"),
        Err(e) => tracing::error!("Default data seeding failed: {}", e.format_simple()),
    }

    // 6. 初始化 JWT 管理器
    let jwt_manager = Arc::new(JwtManager::new(config.auth.jwt_secret.clone()));
    tracing::info!("JWT manager initialized");

    tracing::info!("Server initialization complete");

    Ok(StartupContext {
        db: Arc::new(db),
        jwt_manager,
        config,
        _log_guard: log_guard,
    })
}
