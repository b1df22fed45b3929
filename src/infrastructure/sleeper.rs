//! 等待能力 - 基础设施层
//!
//! 稳定等待和就绪重试都只依赖这个 trait，测试中可以换成假时钟

use async_trait::async_trait;
use std::time::Duration;

/// 等待一段时间
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// 基于 tokio 定时器的实现
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
