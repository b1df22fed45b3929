//! 结果上报服务 - 业务能力层
//!
//! 每个处理结果按处理顺序送到这里，只负责"写到哪里"

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::models::{OutcomeKind, ProcessingOutcome};
use crate::workflow::ImageCtx;

/// 结果接收方
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    async fn emit(&self, ctx: &ImageCtx, outcome: &ProcessingOutcome) -> Result<()>;
}

/// 输出到日志
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

#[async_trait]
impl OutcomeSink for ConsoleSink {
    async fn emit(&self, ctx: &ImageCtx, outcome: &ProcessingOutcome) -> Result<()> {
        match outcome {
            ProcessingOutcome::Success(question) => {
                info!("{} The question is: {}", ctx, question.question_text());
                info!("{} The available options are:", ctx);
                for (idx, option) in question.options().iter().enumerate() {
                    info!("{}   Option {}: {}", ctx, idx + 1, option);
                }
            }
            ProcessingOutcome::NoQuestionFound => {
                warn!("{} ⚠️ No question found in the image.", ctx);
            }
            ProcessingOutcome::ExtractionFailed(e) => {
                error!(
                    "{} ❌ Failed to process image {}: {}",
                    ctx,
                    ctx.path.display(),
                    e
                );
            }
            ProcessingOutcome::FileNeverAppeared => {
                warn!(
                    "{} ⚠️ File not found after multiple attempts: {}",
                    ctx,
                    ctx.path.display()
                );
            }
        }
        Ok(())
    }
}

/// 结果文件中的一行
#[derive(Debug, Serialize)]
struct OutcomeLine<'a> {
    timestamp: String,
    file: &'a str,
    path: String,
    outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    record: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// 以 JSON Lines 形式追加写入结果文件
pub struct JsonlSink {
    path: PathBuf,
    // 保证多条记录不会交错写入
    write_lock: Mutex<()>,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OutcomeSink for JsonlSink {
    async fn emit(&self, ctx: &ImageCtx, outcome: &ProcessingOutcome) -> Result<()> {
        let line = OutcomeLine {
            timestamp: chrono::Local::now().to_rfc3339(),
            file: &ctx.file_name,
            path: ctx.path.to_string_lossy().into_owned(),
            outcome: outcome.kind(),
            record: outcome.question().map(|q| q.to_record()),
            reason: outcome.reason(),
        };

        let mut json = serde_json::to_string(&line)?;
        json.push('\n');

        debug!("写入结果: {} -> {}", ctx.file_name, self.path.display());

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("无法打开结果文件: {}", self.path.display()))?;

        file.write_all(json.as_bytes())
            .await
            .with_context(|| format!("无法写入结果文件: {}", self.path.display()))?;
        file.flush().await?;

        Ok(())
    }
}

/// 同时送给多个接收方
///
/// 某个接收方失败不影响其余接收方，最后返回第一个错误
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn OutcomeSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn OutcomeSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

#[async_trait]
impl OutcomeSink for FanoutSink {
    async fn emit(&self, ctx: &ImageCtx, outcome: &ProcessingOutcome) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.emit(ctx, outcome).await {
                error!("{} 结果上报失败: {:#}", ctx, e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
