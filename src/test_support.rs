//! 单元测试用的替身实现

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::OcrError;
use crate::infrastructure::Sleeper;
use crate::models::{OutcomeKind, ParsedQuestion, ProcessingOutcome};
use crate::services::{OutcomeSink, TextExtractor};
use crate::workflow::ImageCtx;

/// 假时钟：不真正等待，只记录每次等待的时长
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// 返回固定结果的 OCR
pub struct StubExtractor {
    text: Option<String>,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract_text(&self, _image_path: &Path) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone().ok_or_else(|| OcrError::CommandFailed {
            status: "exit status: 1".to_string(),
            stderr: "stub failure".to_string(),
        })
    }
}

/// 收集所有上报结果
#[derive(Debug, Default)]
pub struct CollectingSink {
    received: Mutex<Vec<(String, OutcomeKind, Option<ParsedQuestion>)>>,
}

impl CollectingSink {
    pub fn kinds(&self) -> Vec<(String, OutcomeKind)> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|(name, kind, _)| (name.clone(), *kind))
            .collect()
    }

    pub fn questions(&self) -> Vec<ParsedQuestion> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, _, question)| question.clone())
            .collect()
    }
}

#[async_trait]
impl OutcomeSink for CollectingSink {
    async fn emit(&self, ctx: &ImageCtx, outcome: &ProcessingOutcome) -> Result<()> {
        self.received.lock().unwrap().push((
            ctx.file_name.clone(),
            outcome.kind(),
            outcome.question().cloned(),
        ));
        Ok(())
    }
}
