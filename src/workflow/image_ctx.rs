//! 图片处理上下文
//!
//! 封装"我正在处理第几张图片、它叫什么"这一信息

use std::fmt::Display;
use std::path::PathBuf;

use crate::models::file_identity;

/// 图片处理上下文
#[derive(Debug, Clone)]
pub struct ImageCtx {
    /// 图片完整路径
    pub path: PathBuf,

    /// 文件名（同时也是去重用的文件标识）
    pub file_name: String,

    /// 本次运行中的处理序号（从1开始，仅用于日志显示）
    pub sequence: usize,
}

impl ImageCtx {
    /// 创建新的图片上下文
    pub fn new(path: PathBuf, sequence: usize) -> Self {
        let file_name = file_identity(&path).unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path,
            file_name,
            sequence,
        }
    }
}

impl Display for ImageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[图片 #{} {}]", self.sequence, self.file_name)
    }
}
