//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、准备监听目录、组装协调器和结果接收方
//! 2. **启动监听**：持有 `FsWatcher`，事件经通道送到单一消费循环
//! 3. **顺序处理**：一次处理一个事件，按投递顺序
//! 4. **优雅退出**：收到 Ctrl-C 后等当前事件处理完再退出
//! 5. **全局统计**：汇总所有图片的处理结果

use anyhow::{Context, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{FsWatcher, TokioSleeper};
use crate::models::{ChangeEvent, OutcomeKind};
use crate::orchestrator::watch_coordinator::WatchCoordinator;
use crate::services::{ConsoleSink, DedupTracker, FanoutSink, JsonlSink, TesseractExtractor};
use crate::utils::logging::{init_log_file, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    watch_dir: PathBuf,
    coordinator: WatchCoordinator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;

        let watch_dir = config.resolved_watch_dir();
        prepare_watch_dir(&watch_dir, config.create_watch_dir)?;

        log_startup(&config, &watch_dir);

        let mut sink = FanoutSink::new().with(Arc::new(ConsoleSink));
        if let Some(output) = &config.output_log_file {
            init_log_file(output, &watch_dir).context("初始化结果文件失败")?;
            info!("📝 识别结果将追加写入: {}", output);
            sink = sink.with(Arc::new(JsonlSink::new(output)));
        }

        let coordinator = WatchCoordinator::from_config(
            &config,
            Arc::new(TesseractExtractor::from_config(&config)),
            Arc::new(DedupTracker::new()),
            Arc::new(sink),
            Arc::new(TokioSleeper),
        );

        Ok(Self {
            config,
            watch_dir,
            coordinator,
        })
    }

    /// 运行应用主逻辑，直到收到 Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let (tx, rx) = mpsc::channel(self.config.event_channel_capacity);

        let watcher = FsWatcher::start(&self.watch_dir, tx)
            .map_err(AppError::from)
            .context("启动目录监听失败")?;

        info!(
            "👀 Started monitoring {} for new images.",
            watcher.path().display()
        );

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("无法监听退出信号: {}", e);
                std::future::pending::<()>().await;
            }
            info!("收到退出信号，停止监听...");
        };

        let stats = drive_events(&self.coordinator, rx, shutdown).await;

        drop(watcher);
        print_final_stats(&stats, &self.config);

        Ok(())
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatchStats {
    pub success: usize,
    pub no_question: usize,
    pub extraction_failed: usize,
    pub never_appeared: usize,
    /// 被忽略的事件（目录、非图片、重复）
    pub ignored: usize,
}

impl WatchStats {
    pub fn record(&mut self, kind: Option<OutcomeKind>) {
        match kind {
            Some(OutcomeKind::Success) => self.success += 1,
            Some(OutcomeKind::NoQuestionFound) => self.no_question += 1,
            Some(OutcomeKind::ExtractionFailed) => self.extraction_failed += 1,
            Some(OutcomeKind::FileNeverAppeared) => self.never_appeared += 1,
            None => self.ignored += 1,
        }
    }

    /// 实际处理的图片数量
    pub fn processed(&self) -> usize {
        self.success + self.no_question + self.extraction_failed + self.never_appeared
    }

    pub fn failed(&self) -> usize {
        self.processed() - self.success
    }
}

/// 事件消费循环
///
/// 逐个处理事件，直到 `shutdown` 完成或通道关闭。
/// 退出信号只在两个事件之间检查，正在处理的事件总会完成。
pub async fn drive_events<F>(
    coordinator: &WatchCoordinator,
    mut rx: mpsc::Receiver<ChangeEvent>,
    shutdown: F,
) -> WatchStats
where
    F: Future<Output = ()>,
{
    let mut stats = WatchStats::default();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            event = rx.recv() => match event {
                Some(event) => {
                    let kind = coordinator.on_create(&event).await;
                    stats.record(kind);
                }
                None => {
                    warn!("事件通道已关闭，停止监听");
                    break;
                }
            },
        }
    }

    stats
}

/// 确保监听目录存在
fn prepare_watch_dir(dir: &Path, create: bool) -> AppResult<()> {
    if dir.is_dir() {
        return Ok(());
    }

    if !create {
        return Err(AppError::directory_not_found(dir));
    }

    std::fs::create_dir_all(dir).map_err(|e| AppError::create_dir_failed(dir, e))?;
    info!("📁 已创建监听目录: {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::services::TextExtractor;
    use crate::test_support::{CollectingSink, RecordingSleeper, StubExtractor};
    use async_trait::async_trait;
    use std::time::Duration;

    /// 每次识别都要耗时一段时间的 OCR
    struct SlowExtractor(Duration);

    #[async_trait]
    impl TextExtractor for SlowExtractor {
        async fn extract_text(&self, _image_path: &Path) -> Result<String, OcrError> {
            tokio::time::sleep(self.0).await;
            Ok("Question 1 of 1\nSlow?\nA)Yes".to_string())
        }
    }

    fn coordinator(sink: Arc<CollectingSink>) -> WatchCoordinator {
        WatchCoordinator::from_config(
            &Config::default(),
            Arc::new(StubExtractor::text("Question 1 of 1\nReady?\nA)Yes")),
            Arc::new(DedupTracker::new()),
            sink,
            Arc::new(RecordingSleeper::default()),
        )
    }

    #[tokio::test]
    async fn test_drive_events_until_channel_closes() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("a.png");
        std::fs::write(&image, b"png").unwrap();

        let sink = Arc::new(CollectingSink::default());
        let coordinator = coordinator(sink.clone());
        let (tx, rx) = mpsc::channel(8);

        tx.send(ChangeEvent::file(&image)).await.unwrap();
        tx.send(ChangeEvent::file(&image)).await.unwrap();
        tx.send(ChangeEvent::file(dir.path().join("readme.md"))).await.unwrap();
        tx.send(ChangeEvent::file(dir.path().join("late.bmp"))).await.unwrap();
        drop(tx);

        let stats = drive_events(&coordinator, rx, std::future::pending()).await;

        assert_eq!(
            stats,
            WatchStats {
                success: 1,
                never_appeared: 1,
                ignored: 2,
                ..Default::default()
            }
        );
        assert_eq!(stats.processed(), 2);
        assert_eq!(stats.failed(), 1);
        assert_eq!(
            sink.kinds(),
            vec![
                ("a.png".to_string(), OutcomeKind::Success),
                ("late.bmp".to_string(), OutcomeKind::FileNeverAppeared),
            ]
        );
    }

    #[tokio::test]
    async fn test_drive_events_stops_on_shutdown() {
        let sink = Arc::new(CollectingSink::default());
        let coordinator = coordinator(sink.clone());
        let (tx, rx) = mpsc::channel(8);

        let stats = drive_events(&coordinator, rx, async {}).await;

        assert_eq!(stats, WatchStats::default());
        assert!(sink.kinds().is_empty());
        drop(tx);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_in_flight_event() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        std::fs::write(&first, b"png").unwrap();
        std::fs::write(&second, b"png").unwrap();

        let sink = Arc::new(CollectingSink::default());
        let coordinator = WatchCoordinator::from_config(
            &Config::default(),
            Arc::new(SlowExtractor(Duration::from_millis(300))),
            Arc::new(DedupTracker::new()),
            sink.clone(),
            Arc::new(RecordingSleeper::default()),
        );
        let (tx, rx) = mpsc::channel(8);
        tx.send(ChangeEvent::file(&first)).await.unwrap();
        tx.send(ChangeEvent::file(&second)).await.unwrap();

        // 第一张图片还在识别时就发出退出信号
        let shutdown = tokio::time::sleep(Duration::from_millis(100));
        let stats = drive_events(&coordinator, rx, shutdown).await;

        assert_eq!(
            stats,
            WatchStats {
                success: 1,
                ..Default::default()
            }
        );
        assert_eq!(
            sink.kinds(),
            vec![("first.png".to_string(), OutcomeKind::Success)]
        );
        drop(tx);
    }

    #[test]
    fn test_prepare_watch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("screenshots");

        assert!(prepare_watch_dir(&target, false).is_err());
        prepare_watch_dir(&target, true).unwrap();
        assert!(target.is_dir());
        prepare_watch_dir(&target, false).unwrap();
    }

    #[tokio::test]
    async fn test_initialize_creates_watch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let watch_dir = dir.path().join("shots");
        let config = Config {
            watch_dir: watch_dir.to_string_lossy().into_owned(),
            ..Config::default()
        };

        let app = App::initialize(config).await.unwrap();
        assert_eq!(app.watch_dir, watch_dir);
        assert!(watch_dir.is_dir());
    }

    #[tokio::test]
    async fn test_initialize_writes_session_header() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("outcomes.jsonl");
        let config = Config {
            watch_dir: dir.path().to_string_lossy().into_owned(),
            output_log_file: Some(output.to_string_lossy().into_owned()),
            ..Config::default()
        };

        App::initialize(config).await.unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let header: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(header["watch_dir"], *dir.path().to_string_lossy());
    }
}
