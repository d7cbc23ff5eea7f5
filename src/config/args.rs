//! 命令行参数解析
//!
//! 提供从命令行参数中提取配置文件路径的工具

/// 从命令行参数解析配置文件路径
///
/// 支持多种格式:
/// - `-c path` / `--config path`
/// - `-c=path` / `--config=path`
pub fn parse_config_path(args: &[String]) -> Option<String> {
    let mut i = 1; // 跳过程序名
    while i < args.len() {
        let arg = &args[i];

        // -c 或 --config 后带值
        if (arg == "-c" || arg == "--config") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }

        // -c=value 或 --config=value
        if let Some(path) = arg.strip_prefix("-c=") {
            return Some(path.to_string());
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }

        i += 1;
    }

    None
}
