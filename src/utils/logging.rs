//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// # 参数
/// - `verbose`: 是否输出 debug 级别日志（RUST_LOG 环境变量优先）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(model_name: &str, history_folder: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 试卷生成模式");
    info!("🤖 使用模型: {}", model_name);
    info!("📁 历史记录目录: {}", history_folder);
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示（按字符计数，避免切断多字节字符）
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    let mut preview: String = text.chars().take(max_len).collect();
    if preview.len() < text.len() {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_text("短文本", 80), "短文本");
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "あ".repeat(100);
        let truncated = truncate_text(&long, 10);
        assert_eq!(truncated.chars().count(), 13); // 10 个字符 + "..."
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_exact_length_unchanged() {
        let text = "م".repeat(10);
        assert_eq!(truncate_text(&text, 10), text);
    }
}
