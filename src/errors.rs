use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    // 启动期迁移错误
    #[error("Migration error: {0}")]
    Migration(#[from] migration::MigrateError),

    // 默认数据写入错误
    #[error("Seed insert failed for '{title}': {source}")]
    Seed {
        title: String,
        #[source]
        source: sea_orm::DbErr,
    },

    // 认证错误
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized")]
    Unauthorized,

    // 通用错误
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "E001",
            AppError::Migration(_) => "E002",
            AppError::Seed { .. } => "E003",
            AppError::InvalidCredentials => "E004",
            AppError::TokenExpired => "E005",
            AppError::InvalidToken => "E006",
            AppError::Unauthorized => "E007",
            AppError::NotFound => "E008",
            AppError::BadRequest(_) => "E009",
            AppError::Internal(_) => "E010",
            AppError::Config(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database Error",
            AppError::Migration(_) => "Migration Error",
            AppError::Seed { .. } => "Seed Error",
            AppError::InvalidCredentials => "Invalid Credentials",
            AppError::TokenExpired => "Token Expired",
            AppError::InvalidToken => "Invalid Token",
            AppError::Unauthorized => "Unauthorized",
            AppError::NotFound => "Not Found",
            AppError::BadRequest(_) => "Bad Request",
            AppError::Internal(_) => "Internal Server Error",
            AppError::Config(_) => "Configuration Error",
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("[{}] {}: {}", self.code(), self.error_type(), self)
    }

    /// 格式化为彩色输出（用于日志）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.to_string().white()
        )
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::Unauthorized => StatusCode::UNAUTHORIZED,

            AppError::NotFound => StatusCode::NOT_FOUND,

            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Seed { .. }
            | AppError::Internal(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::TokenExpired => "token_expired",
            AppError::InvalidToken => "invalid_token",
            AppError::Unauthorized => "unauthorized",
            AppError::NotFound => "not_found",
            AppError::BadRequest(_) => "bad_request",
            _ => "internal_error",
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        })
    }
}

// 为 Box<dyn std::error::Error> 实现转换
impl From<Box<dyn std::error::Error>> for AppError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        AppError::Internal(err.to_string())
    }
}
