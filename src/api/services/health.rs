use actix_web::{HttpResponse, web};
use chrono::Utc;
use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health/ready
pub async fn readiness(db: web::Data<Arc<DatabaseConnection>>) -> HttpResponse {
    let db_status = match check_database_connection(&db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    let is_ready = db_status == "connected";

    let status_code = if is_ready {
        actix_web::http::StatusCode::OK
    } else {
        actix_web::http::StatusCode::SERVICE_UNAVAILABLE
    };

    HttpResponse::build(status_code).json(serde_json::json!({
        "status": if is_ready { "ready" } else { "not_ready" },
        "database": db_status,
    }))
}

/// GET /health/live
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
    }))
}

/// GET /api/status
pub async fn api_status() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "OK",
        "message": "lorekeeper API is running",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 检查数据库连接
async fn check_database_connection(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.ping().await
}
