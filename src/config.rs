use crate::error::ConfigError;
use crate::services::readiness_gate::RetryPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// 指定 TOML 配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "QUIZ_WATCH_CONFIG";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听的截图目录（相对路径基于当前工作目录）
    pub watch_dir: String,
    /// 需要处理的图片扩展名（区分大小写，不含点号）
    pub image_extensions: Vec<String>,
    /// 检测到新文件后的等待时间（毫秒）
    pub settle_delay_ms: u64,
    /// 等待文件出现的最大检查次数
    pub readiness_max_attempts: u32,
    /// 每次检查之间的间隔（毫秒）
    pub readiness_interval_ms: u64,
    /// tesseract 可执行文件
    pub tesseract_cmd: String,
    /// OCR 语言（传给 tesseract 的 -l 参数）
    pub ocr_language: Option<String>,
    /// 事件通道容量
    pub event_channel_capacity: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 识别结果输出文件（JSON Lines），不设置则只输出到日志
    pub output_log_file: Option<String>,
    /// 监听目录不存在时是否自动创建
    pub create_watch_dir: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_dir: "screenshots".to_string(),
            image_extensions: ["png", "jpg", "jpeg", "bmp", "gif"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            settle_delay_ms: 1000,
            readiness_max_attempts: 10,
            readiness_interval_ms: 1000,
            tesseract_cmd: "tesseract".to_string(),
            ocr_language: None,
            event_channel_capacity: 100,
            verbose_logging: false,
            output_log_file: None,
            create_watch_dir: true,
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// 从 TOML 文件加载配置，文件中缺省的项使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 加载最终配置
    ///
    /// 设置了 `QUIZ_WATCH_CONFIG` 时先读取该 TOML 文件，再用环境变量覆盖；
    /// 最后做一次合法性校验。
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                Self::from_toml_file(Path::new(&path))?.apply_env()
            }
            _ => Self::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    /// 用环境变量覆盖已有配置
    pub fn apply_env(mut self) -> Self {
        if let Ok(v) = std::env::var("WATCH_DIR") {
            self.watch_dir = v;
        }
        if let Ok(v) = std::env::var("IMAGE_EXTENSIONS") {
            self.image_extensions = parse_extension_list(&v);
        }
        self.settle_delay_ms = env_or("SETTLE_DELAY_MS", self.settle_delay_ms);
        self.readiness_max_attempts = env_or("READINESS_MAX_ATTEMPTS", self.readiness_max_attempts);
        self.readiness_interval_ms = env_or("READINESS_INTERVAL_MS", self.readiness_interval_ms);
        if let Ok(v) = std::env::var("TESSERACT_CMD") {
            self.tesseract_cmd = v;
        }
        if let Ok(v) = std::env::var("OCR_LANGUAGE") {
            self.ocr_language = Some(v).filter(|lang| !lang.trim().is_empty());
        }
        self.event_channel_capacity = env_or("EVENT_CHANNEL_CAPACITY", self.event_channel_capacity);
        self.verbose_logging = env_or("VERBOSE_LOGGING", self.verbose_logging);
        if let Ok(v) = std::env::var("OUTPUT_LOG_FILE") {
            self.output_log_file = Some(v).filter(|path| !path.trim().is_empty());
        }
        self.create_watch_dir = env_or("CREATE_WATCH_DIR", self.create_watch_dir);
        self
    }

    /// 校验配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch_dir.trim().is_empty() {
            return Err(ConfigError::invalid("watch_dir", "不能为空"));
        }
        if self.image_extensions.is_empty() {
            return Err(ConfigError::invalid("image_extensions", "至少需要一个扩展名"));
        }
        if self.readiness_max_attempts == 0 {
            return Err(ConfigError::invalid("readiness_max_attempts", "必须大于 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::invalid("event_channel_capacity", "必须大于 0"));
        }
        if self.tesseract_cmd.trim().is_empty() {
            return Err(ConfigError::invalid("tesseract_cmd", "不能为空"));
        }
        Ok(())
    }

    /// 监听目录的绝对路径
    pub fn resolved_watch_dir(&self) -> PathBuf {
        let dir = PathBuf::from(&self.watch_dir);
        if dir.is_absolute() {
            return dir;
        }
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(dir),
            Err(_) => dir,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.readiness_max_attempts,
            interval: Duration::from_millis(self.readiness_interval_ms),
        }
    }
}

fn env_or<T: FromStr>(var_name: &str, default: T) -> T {
    std::env::var(var_name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}
