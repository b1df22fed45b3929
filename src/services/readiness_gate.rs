//! 文件就绪检查服务 - 业务能力层
//!
//! 只检查文件是否存在，不检查是否已经写完（不比较文件大小）

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::infrastructure::Sleeper;

/// 有限次数重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大检查次数
    pub max_attempts: u32,
    /// 两次检查之间的间隔
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(1),
        }
    }
}

/// 文件就绪检查服务
pub struct ReadinessGate {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ReadinessGate {
    pub fn new(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// 等待文件出现
    ///
    /// 文件存在立即返回 true；检查 `max_attempts` 次仍不存在返回 false。
    /// 只在两次检查之间等待，最后一次失败后直接返回。
    pub async fn await_readable(&self, path: &Path) -> bool {
        for attempt in 1..=self.policy.max_attempts {
            if path_exists(path).await {
                debug!("文件已就绪 (第 {} 次检查): {}", attempt, path.display());
                return true;
            }

            debug!(
                "文件尚未出现 ({}/{}): {}",
                attempt,
                self.policy.max_attempts,
                path.display()
            );

            if attempt < self.policy.max_attempts {
                self.sleeper.sleep(self.policy.interval).await;
            }
        }

        false
    }
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
