//! 文字识别服务 - 业务能力层
//!
//! 只负责"图片 → 文本"，不关心题目格式
//!
//! ## 技术栈
//! - 使用 `image` crate 确认文件能被解码为图片
//! - 调用系统安装的 `tesseract` 命令行进行识别，结果从 stdout 读取

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;
use crate::error::OcrError;

/// 文字识别能力
///
/// 可能很慢，也可能失败；失败只影响当前图片
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// 识别图片中的文字，返回未经处理的整段文本
    async fn extract_text(&self, image_path: &Path) -> Result<String, OcrError>;
}

/// 基于 tesseract 命令行的实现
#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    command: String,
    language: Option<String>,
}

impl TesseractExtractor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: None,
        }
    }

    /// 指定识别语言（如 `eng`、`chi_sim+eng`）
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let extractor = Self::new(&config.tesseract_cmd);
        match &config.ocr_language {
            Some(lang) => extractor.with_language(lang),
            None => extractor,
        }
    }

    /// 读取图片头部，确认文件是可解码的图片
    async fn verify_image(image_path: &Path) -> Result<(), OcrError> {
        let path: PathBuf = image_path.to_path_buf();
        let (width, height) = tokio::task::spawn_blocking(move || {
            image::image_dimensions(&path).map_err(|source| OcrError::ImageDecodeFailed {
                path: path.clone(),
                source,
            })
        })
        .await??;

        debug!("图片尺寸: {}x{}", width, height);
        Ok(())
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl TextExtractor for TesseractExtractor {
    async fn extract_text(&self, image_path: &Path) -> Result<String, OcrError> {
        Self::verify_image(image_path).await?;

        let mut cmd = Command::new(&self.command);
        cmd.arg(image_path).arg("stdout");
        if let Some(lang) = &self.language {
            cmd.arg("-l").arg(lang);
        }
        cmd.kill_on_drop(true);

        debug!("调用 OCR: {} {}", self.command, image_path.display());

        let output = cmd.output().await.map_err(|source| OcrError::SpawnFailed {
            command: self.command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(OcrError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR 完成，识别出 {} 个字符", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_blank_png(path: &Path) {
        image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]))
            .save(path)
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejects_file_that_is_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = TesseractExtractor::default()
            .extract_text(&path)
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::ImageDecodeFailed { .. }));
    }

    #[tokio::test]
    async fn test_missing_binary_reports_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        write_blank_png(&path);

        let extractor = TesseractExtractor::new("quiz-watch-no-such-ocr-binary");
        let err = extractor.extract_text(&path).await.unwrap_err();
        match err {
            OcrError::SpawnFailed { command, .. } => {
                assert_eq!(command, "quiz-watch-no-such-ocr-binary")
            }
            other => panic!("应该是启动失败，实际: {:?}", other),
        }
    }

    #[test]
    fn test_from_config_carries_language() {
        let config = Config {
            tesseract_cmd: "/opt/tesseract/bin/tesseract".to_string(),
            ocr_language: Some("eng".to_string()),
            ..Config::default()
        };
        let extractor = TesseractExtractor::from_config(&config);
        assert_eq!(extractor.command, "/opt/tesseract/bin/tesseract");
        assert_eq!(extractor.language.as_deref(), Some("eng"));
    }

    /// 需要本机安装 tesseract：cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_tesseract_on_blank_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        write_blank_png(&path);

        let text = TesseractExtractor::default().extract_text(&path).await;
        assert!(text.is_ok(), "tesseract 调用失败: {:?}", text.err());
    }
}
