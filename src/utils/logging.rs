//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::orchestrator::WatchStats;

/// 初始化结果文件
///
/// 结果文件是 JSON Lines，会话头也写成一行 JSON，追加在已有内容之后
///
/// # 参数
/// - `log_file_path`: 结果文件路径
/// - `watch_dir`: 本次监听的目录
pub fn init_log_file(log_file_path: &str, watch_dir: &Path) -> Result<()> {
    let path = Path::new(log_file_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("无法创建结果文件目录: {}", parent.display()))?;
    }

    let header = serde_json::json!({
        "session_start": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "watch_dir": watch_dir.to_string_lossy(),
    });

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("无法打开结果文件: {}", path.display()))?;
    writeln!(file, "{}", header)
        .with_context(|| format!("无法写入结果文件: {}", path.display()))?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 配置
/// - `watch_dir`: 实际监听的目录
pub fn log_startup(config: &Config, watch_dir: &Path) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 截图题目识别模式");
    info!("📂 监听目录: {}", watch_dir.display());
    info!("🖼️ 图片类型: {}", config.image_extensions.join(", "));
    info!(
        "⏱️ 稳定等待: {}ms, 就绪检查: {} 次 / 间隔 {}ms",
        config.settle_delay_ms, config.readiness_max_attempts, config.readiness_interval_ms
    );
    info!(
        "🔤 OCR: {} (语言: {})",
        config.tesseract_cmd,
        config.ocr_language.as_deref().unwrap_or("默认")
    );
    info!("{}", "=".repeat(60));
}

/// 单张图片处理前后的分隔线
pub fn log_separator() {
    info!("{}", "+".repeat(55));
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 处理统计
/// - `config`: 配置
pub fn print_final_stats(stats: &WatchStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 监听结束统计");
    info!(
        "结束时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.processed());
    info!("❓ 未找到题目: {}", stats.no_question);
    info!("❌ 识别失败: {}", stats.extraction_failed);
    info!("⌛ 文件未出现: {}", stats.never_appeared);
    info!("🚫 忽略事件: {}", stats.ignored);
    info!("{}", "=".repeat(60));
    if let Some(output) = &config.output_log_file {
        info!("\n识别结果已保存至: {}", output);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
