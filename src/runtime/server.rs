use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;

use crate::api::{middleware as app_middleware, services};
use crate::runtime::startup::StartupContext;
use crate::storage::SeaOrmBackend;

pub async fn run_server(ctx: StartupContext) -> std::io::Result<()> {
    let bind_addr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port);

    tracing::info!("Starting HTTP server on {}", bind_addr);

    // 创建存储后端
    let storage = Arc::new(SeaOrmBackend::new(ctx.db.clone()));

    HttpServer::new(move || {
        App::new()
            // 共享状态
            .app_data(web::Data::new(ctx.db.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(ctx.jwt_manager.clone()))
            // 中间件
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::DefaultHeaders::new().add(("X-Version", env!("CARGO_PKG_VERSION"))))
            // 健康检查端点（无需认证）
            .service(
                web::scope("/health")
                    .route("", web::get().to(services::health_check))
                    .route("/ready", web::get().to(services::readiness))
                    .route("/live", web::get().to(services::liveness)),
            )
            // 服务状态
            .route("/api/status", web::get().to(services::api_status))
            // 用户 API（注册/登录公开，其余需要 JWT 认证）
            .service(
                web::scope("/api/users")
                    .route("/register", web::post().to(services::register))
                    .route("/login", web::post().to(services::login))
                    .route(
                        "/profile",
                        web::get()
                            .to(services::user_get_profile)
                            .wrap(app_middleware::JwtAuth::new(ctx.jwt_manager.clone())),
                    )
                    .route(
                        "/characters/count",
                        web::get()
                            .to(services::user_character_count)
                            .wrap(app_middleware::JwtAuth::new(ctx.jwt_manager.clone())),
                    )
                    .route(
                        "/settings/count",
                        web::get()
                            .to(services::user_setting_count)
                            .wrap(app_middleware::JwtAuth::new(ctx.jwt_manager.clone())),
                    ),
            )
            // 角色 API
            .service(
                web::scope("/api/characters")
                    .route("", web::get().to(services::character_list))
                    .route("", web::post().to(services::character_create))
                    .route("/{id}", web::get().to(services::character_get))
                    .route("/{id}", web::put().to(services::character_update))
                    .route("/{id}", web::delete().to(services::character_delete)),
            )
            // 设定 API
            .service(
                web::scope("/api/settings")
                    .route("", web::get().to(services::setting_list))
                    .route("", web::post().to(services::setting_create))
                    .route("/{id}", web::get().to(services::setting_get))
                    .route("/{id}", web::put().to(services::setting_update))
                    .route("/{id}", web::delete().to(services::setting_delete)),
            )
    })
    .bind(&bind_addr)?
    .run()
    .await
}
