use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 目录监听错误
    #[error("监听错误: {0}")]
    Watch(#[from] WatchError),
    /// OCR 识别错误
    #[error("OCR错误: {0}")]
    Ocr(#[from] OcrError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 目录监听错误
#[derive(Debug, Error)]
pub enum WatchError {
    /// 创建监听器失败
    #[error("创建文件监听器失败: {source}")]
    WatcherCreationFailed { source: notify::Error },
    /// 注册监听目录失败
    #[error("无法监听目录 {}: {source}", .path.display())]
    WatchFailed { path: PathBuf, source: notify::Error },
}

/// OCR 识别错误
///
/// 单张图片的识别失败不会中断监听循环，只会被转换为 `ExtractionFailed` 结果
#[derive(Debug, Error)]
pub enum OcrError {
    /// 图片无法解码
    #[error("无法解码图片 {}: {source}", .path.display())]
    ImageDecodeFailed {
        path: PathBuf,
        source: image::ImageError,
    },
    /// 无法启动 OCR 程序
    #[error("无法启动 OCR 程序 `{command}`: {source}")]
    SpawnFailed {
        command: String,
        source: std::io::Error,
    },
    /// OCR 程序非正常退出
    #[error("OCR 程序退出异常 ({status}): {stderr}")]
    CommandFailed { status: String, stderr: String },
    /// 后台任务执行失败
    #[error("OCR 后台任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 目录不存在
    #[error("目录不存在: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },
    /// 创建目录失败
    #[error("创建目录失败 ({}): {source}", .path.display())]
    CreateDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// 配置项取值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    Invalid { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建目录不存在错误
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        AppError::File(FileError::DirectoryNotFound { path: path.into() })
    }

    /// 创建目录创建失败错误
    pub fn create_dir_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::CreateDirFailed {
            path: path.into(),
            source,
        })
    }
}

impl ConfigError {
    /// 创建配置项不合法错误
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
