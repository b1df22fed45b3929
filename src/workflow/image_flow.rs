//! 图片处理流程 - 流程层
//!
//! 核心职责：定义"一张图片"的完整处理流程
//!
//! 流程顺序：
//! 1. 等待文件出现（有限次数重试）
//! 2. OCR 识别文字
//! 3. 解析题干和选项

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::models::ProcessingOutcome;
use crate::services::{QuestionParser, ReadinessGate, TextExtractor};
use crate::utils::logging::truncate_text;
use crate::workflow::image_ctx::ImageCtx;

/// 图片处理流程
///
/// - 不持有监听器，不做去重
/// - 每一步的失败都转换成 `ProcessingOutcome`，不向上抛错
/// - OCR 本身不重试，只有文件存在性检查会重试
pub struct ImageFlow {
    gate: ReadinessGate,
    extractor: Arc<dyn TextExtractor>,
    parser: QuestionParser,
    verbose_logging: bool,
}

impl ImageFlow {
    /// 创建新的图片处理流程
    pub fn new(gate: ReadinessGate, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            gate,
            extractor,
            parser: QuestionParser::new(),
            verbose_logging: false,
        }
    }

    /// 开启详细日志（输出 OCR 原文）
    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    pub async fn run(&self, ctx: &ImageCtx) -> ProcessingOutcome {
        // ========== 步骤 1: 等待文件就绪 ==========
        if !self.gate.await_readable(&ctx.path).await {
            warn!(
                "{} 检查 {} 次后文件仍不存在",
                ctx,
                self.gate.policy().max_attempts
            );
            return ProcessingOutcome::FileNeverAppeared;
        }

        // ========== 步骤 2: OCR ==========
        info!("{} 🔍 正在识别图片文字...", ctx);
        let text = match self.extractor.extract_text(&ctx.path).await {
            Ok(text) => text,
            Err(e) => {
                error!("{} OCR 识别失败: {}", ctx, e);
                return ProcessingOutcome::ExtractionFailed(e);
            }
        };

        if self.verbose_logging {
            info!("{} OCR 原文: {}", ctx, truncate_text(&text.replace('\n', " | "), 200));
        } else {
            debug!("{} OCR 完成，共 {} 行", ctx, text.lines().count());
        }

        // ========== 步骤 3: 解析题目 ==========
        self.parser.parse_text(&text)
    }
}
