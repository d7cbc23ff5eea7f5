use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

/// 初始化日志
///
/// 配置了日志文件时返回写入线程的 guard，
/// 调用方需持有它直到进程退出，否则缓冲日志会丢失。
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let guard = match &config.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "lorekeeper.log".to_string());

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            match config.format.as_str() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().json().with_writer(writer).with_ansi(false))
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(writer).with_ansi(false))
                        .init();
                }
            }

            Some(guard)
        }
        None => {
            match config.format.as_str() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().json())
                        .init();
                }
                _ => {
                    // pretty format (default)
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            None
        }
    };

    tracing::info!("Logging initialized with level: {}", config.level);
    guard
}
