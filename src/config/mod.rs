pub mod args;
pub mod structs;

mod r#impl;

pub use r#impl::{get_config, init_config};
pub use structs::{AppConfig, AuthConfig, DatabaseConfig, LogConfig, ServerConfig};
