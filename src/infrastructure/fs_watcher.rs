//! 目录监听器 - 基础设施层
//!
//! 唯一持有 notify 监听器的地方，只负责把"新建"事件转成 `ChangeEvent`
//! 送进通道，不关心图片、OCR 和题目

use crate::error::WatchError;
use crate::models::ChangeEvent;
use notify::event::CreateKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// 目录监听器
///
/// 只监听单层目录（不递归），被 drop 时自动停止监听
pub struct FsWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl FsWatcher {
    /// 开始监听目录，新建事件写入 `tx`
    pub fn start(dir: &Path, tx: mpsc::Sender<ChangeEvent>) -> Result<Self, WatchError> {
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    for change in convert_event(event) {
                        debug!("文件事件: {:?}", change);
                        // 回调运行在 notify 自己的线程上，可以阻塞发送
                        if let Err(e) = tx.blocking_send(change) {
                            error!("发送文件事件失败: {}", e);
                        }
                    }
                }
                Err(e) => warn!("监听错误: {:?}", e),
            }
        })
        .map_err(|source| WatchError::WatcherCreationFailed { source })?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::WatchFailed {
                path: dir.to_path_buf(),
                source,
            })?;

        Ok(Self {
            _watcher: watcher,
            path: dir.to_path_buf(),
        })
    }

    /// 被监听的目录
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 把 notify 事件转换为新建事件，非新建事件返回空
fn convert_event(event: Event) -> Vec<ChangeEvent> {
    let is_directory = match event.kind {
        EventKind::Create(CreateKind::Folder) => Some(true),
        EventKind::Create(CreateKind::File) => Some(false),
        // 部分平台不区分类型，只能事后检查
        EventKind::Create(_) => None,
        _ => return Vec::new(),
    };

    event
        .paths
        .into_iter()
        .map(|path| {
            let is_dir = is_directory.unwrap_or_else(|| path.is_dir());
            ChangeEvent::new(path, is_dir)
        })
        .collect()
}
