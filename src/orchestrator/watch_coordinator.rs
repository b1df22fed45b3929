//! 监听协调器 - 编排层
//!
//! ## 职责
//!
//! 对每个新建事件依次执行：
//! 1. 过滤目录和非图片文件
//! 2. 稳定等待（吸收同一次写入触发的多个事件）
//! 3. 去重：同名文件只处理一次，处理开始前就登记
//! 4. 委托 `ImageFlow` 处理图片
//! 5. 把结果交给 `OutcomeSink`
//!
//! 任何单张图片的失败都只会变成一条结果，不会中断监听。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::infrastructure::Sleeper;
use crate::models::{ChangeEvent, OutcomeKind};
use crate::services::{DedupTracker, OutcomeSink, ReadinessGate, TextExtractor};
use crate::utils::logging::log_separator;
use crate::workflow::{ImageCtx, ImageFlow};

/// 监听协调器
///
/// 除了注入的去重集合外不持有其他可变状态
pub struct WatchCoordinator {
    extensions: Vec<String>,
    settle_delay: Duration,
    sleeper: Arc<dyn Sleeper>,
    dedup: Arc<DedupTracker>,
    flow: ImageFlow,
    sink: Arc<dyn OutcomeSink>,
    sequence: AtomicUsize,
}

impl WatchCoordinator {
    /// 按配置组装协调器
    pub fn from_config(
        config: &Config,
        extractor: Arc<dyn TextExtractor>,
        dedup: Arc<DedupTracker>,
        sink: Arc<dyn OutcomeSink>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let gate = ReadinessGate::new(config.retry_policy(), sleeper.clone());
        let flow = ImageFlow::new(gate, extractor).with_verbose_logging(config.verbose_logging);

        Self {
            extensions: config.image_extensions.clone(),
            settle_delay: config.settle_delay(),
            sleeper,
            dedup,
            flow,
            sink,
            sequence: AtomicUsize::new(0),
        }
    }

    /// 处理一个新建事件
    ///
    /// 事件被忽略（目录、非图片、重复）时返回 None，否则返回上报的结果类别
    pub async fn on_create(&self, event: &ChangeEvent) -> Option<OutcomeKind> {
        if event.is_directory {
            debug!("忽略目录: {}", event.path.display());
            return None;
        }

        if !event.has_extension(&self.extensions) {
            debug!("忽略非图片文件: {}", event.path.display());
            return None;
        }

        // 同一次写入可能连续触发多个事件
        self.sleeper.sleep(self.settle_delay).await;

        let Some(identity) = event.identity() else {
            debug!("无法取得文件名，忽略: {}", event.path.display());
            return None;
        };

        if !self.dedup.try_claim(&identity) {
            debug!("重复事件，已处理过: {}", identity);
            return None;
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let ctx = ImageCtx::new(event.path.clone(), sequence);

        log_separator();
        info!("{} 📷 New image detected: {}", ctx, ctx.file_name);

        let outcome = self.flow.run(&ctx).await;
        let kind = outcome.kind();

        if let Err(e) = self.sink.emit(&ctx, &outcome).await {
            error!("{} 结果上报失败: {:#}", ctx, e);
        }

        log_separator();
        Some(kind)
    }

    /// 已处理（含处理中）的图片数量
    pub fn processed_count(&self) -> usize {
        self.dedup.len()
    }
}
