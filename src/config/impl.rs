use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use super::AppConfig;
use crate::errors::AppError;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 从文件加载配置，支持环境变量覆盖
    ///
    /// # 参数
    /// * `config_path` - 可选的配置文件路径
    ///   - `Some(path)`: 使用指定文件（不存在则创建）
    ///   - `None`: 使用默认 "config.toml"（不存在则警告）
    pub fn load(config_path: Option<&str>) -> Self {
        let mut config = Self::load_from_file(config_path);
        config.override_with_env();
        config
    }

    /// 从 TOML 文件加载配置
    fn load_from_file(config_path: Option<&str>) -> Self {
        let path = config_path.unwrap_or("config.toml");
        let is_custom_path = config_path.is_some();

        if !Path::new(path).exists() {
            if is_custom_path {
                // 用户指定了自定义路径: 创建文件
                eprintln!("[WARN] 配置文件不存在: {}", path);
                if let Err(e) = Self::ensure_config_file(path) {
                    eprintln!("[ERROR] 创建配置文件失败 {}: {}", path, e);
                    return Self::default();
                }
                eprintln!("[INFO] 已创建默认配置文件: {}", path);
            } else {
                eprintln!("[WARN] 未找到配置文件: {}，使用内存默认配置", path);
                eprintln!("[HINT] 使用 -c/--config 指定自定义配置文件");
                return Self::default();
            }
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("[ERROR] 解析配置文件失败 {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] 读取配置文件失败 {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// 确保配置文件存在，不存在则写入默认值
    fn ensure_config_file(path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(&Self::default())?;

        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// 用环境变量覆盖配置
    fn override_with_env(&mut self) {
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => eprintln!("[ERROR] 无效的 SERVER_PORT: {}", port),
            }
        }

        if let Ok(database_url) = env::var("DATABASE_URL") {
            self.database.url = database_url;
        }

        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = jwt_secret;
        }
        if let Ok(expire) = env::var("TOKEN_EXPIRE") {
            match expire.parse() {
                Ok(n) => self.auth.token_expire = n,
                Err(_) => eprintln!("[ERROR] 无效的 TOKEN_EXPIRE: {}", expire),
            }
        }

        if let Ok(level) = env::var("RUST_LOG") {
            self.log.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.log.format = format;
        }
        if let Ok(file) = env::var("LOG_FILE") {
            self.log.file = Some(file);
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.len() < 32 {
            return Err(AppError::Config(
                "JWT secret must be at least 32 characters".into(),
            ));
        }

        if self.auth.token_expire <= 0 {
            return Err(AppError::Config(
                "Token expire time must be positive".into(),
            ));
        }

        Ok(())
    }
}

// ============ 全局配置实例 ============

/// 获取全局配置实例
pub fn get_config() -> &'static AppConfig {
    CONFIG.get().expect("配置未初始化，请先调用 init_config()")
}

/// 初始化全局配置
pub fn init_config(config_path: Option<String>) {
    CONFIG.get_or_init(|| AppConfig::load(config_path.as_deref()));
}
