//! 去重服务 - 业务能力层
//!
//! 记录本次运行中已经处理过的文件标识，只增不减

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// 已处理文件集合
///
/// `try_claim` 的检查和插入在同一把锁内完成，多线程同时投递同一文件时只有一个能成功
#[derive(Debug, Default)]
pub struct DedupTracker {
    seen: Mutex<HashSet<String>>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 首次出现时登记并返回 true，已登记过返回 false
    pub fn try_claim(&self, identity: &str) -> bool {
        self.lock().insert(identity.to_string())
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.lock().contains(identity)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // 集合只做插入，锁中毒后数据仍然可用
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
