//! 文件系统事件模型

use std::path::{Path, PathBuf};

/// 目录中新建文件/目录的通知
///
/// 每次创建操作产生一个，由监听协调器消费一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// 新建项的完整路径
    pub path: PathBuf,
    /// 是否为目录
    pub is_directory: bool,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self {
            path: path.into(),
            is_directory,
        }
    }

    /// 新建文件事件
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, false)
    }

    /// 新建目录事件
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, true)
    }

    /// 文件标识（路径的文件名部分），用于去重
    pub fn identity(&self) -> Option<String> {
        file_identity(&self.path)
    }

    /// 路径是否以给定扩展名之一结尾（区分大小写）
    pub fn has_extension(&self, extensions: &[String]) -> bool {
        let path = self.path.to_string_lossy();
        extensions
            .iter()
            .any(|ext| path.ends_with(&format!(".{}", ext)))
    }
}

/// 由路径计算文件标识
pub fn file_identity(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
