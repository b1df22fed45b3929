//! # Quiz Watch
//!
//! 监听截图目录，对新出现的图片做 OCR，并解析出题干和选项
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `FsWatcher` - 唯一的目录监听器 owner，产出新建事件
//! - `Sleeper` - 等待能力，可替换为假时钟
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单张图片
//! - `ReadinessGate` - 有限次数等待文件出现
//! - `TextExtractor` - 图片 → 文本（tesseract）
//! - `QuestionParser` - 文本 → 题干 + 选项
//! - `DedupTracker` - 已处理文件集合
//! - `OutcomeSink` - 结果上报（日志 / JSON Lines）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张图片"的完整处理流程
//! - `ImageCtx` - 上下文封装（路径 + 文件名 + 序号）
//! - `ImageFlow` - 流程编排（就绪 → OCR → 解析）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用生命周期、事件循环、统计
//! - `orchestrator/watch_coordinator` - 过滤、稳定等待、去重、上报
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod test_support;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ChangeEvent, OutcomeKind, ParsedQuestion, ProcessingOutcome};
pub use orchestrator::{App, WatchCoordinator, WatchStats};
pub use services::QuestionParser;
pub use workflow::{ImageCtx, ImageFlow};
