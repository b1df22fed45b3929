//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责事件调度和生命周期，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行、退出）
//! - 持有目录监听器（FsWatcher）
//! - 单一消费循环，按顺序逐个处理事件
//! - 输出全局统计信息
//!
//! ### `watch_coordinator` - 监听协调器
//! - 过滤目录和非图片文件
//! - 稳定等待 + 去重
//! - 委托 ImageFlow 处理单张图片
//! - 把结果交给 OutcomeSink
//!
//! ## 层次关系
//!
//! ```text
//! app (处理事件流)
//!     ↓
//! watch_coordinator (处理单个 ChangeEvent)
//!     ↓
//! workflow::ImageFlow (处理单张图片)
//!     ↓
//! services (能力层：readiness / ocr / parser / sink)
//!     ↓
//! infrastructure (基础设施：FsWatcher / Sleeper)
//! ```

pub mod app;
pub mod watch_coordinator;

// 重新导出主要类型
pub use app::{drive_events, App, WatchStats};
pub use watch_coordinator::WatchCoordinator;
