use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // user_id
    pub username: String, // 冗余存一份，省去 profile 之外的查库
    pub exp: i64,         // 过期时间戳
    pub iat: i64,         // 签发时间戳
}

pub struct JwtManager {
    secret: String,
}

impl JwtManager {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// 生成 JWT Token
    pub fn generate_token(
        &self,
        user_id: i32,
        username: &str,
        expire_in: i64,
    ) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: now + expire_in,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("JWT encode failed: {}", e)))
    }

    /// 验证并解析 Token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }

    /// 提取 Token 中的 user_id
    pub fn extract_user_id(&self, token: &str) -> Result<i32, AppError> {
        let claims = self.verify_token(token)?;
        claims.sub.parse::<i32>().map_err(|_| AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_generate_and_verify() {
        let manager = JwtManager::new("test-secret-key-at-least-32-characters-long".to_string());
        let token = manager.generate_token(123, "tester", 3600).unwrap();

        let claims = manager.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "123");
        assert_eq!(claims.username, "tester");

        let user_id = manager.extract_user_id(&token).unwrap();
        assert_eq!(user_id, 123);
    }

    #[test]
    fn test_jwt_expired_token() {
        let manager = JwtManager::new("test-secret-key-at-least-32-characters-long".to_string());
        // 过期时间设为 -61 秒（已过期，超出默认 leeway）
        let token = manager.generate_token(123, "tester", -61).unwrap();

        let result = manager.verify_token(&token);
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_jwt_garbage_token() {
        let manager = JwtManager::new("test-secret-key-at-least-32-characters-long".to_string());
        let result = manager.verify_token("not-a-token");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
