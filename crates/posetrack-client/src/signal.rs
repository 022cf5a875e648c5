//! 停止信号

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 跨线程共享的停止标志（如 Ctrl-C 处理器）
///
/// 轮询循环在每次迭代检查此标志；克隆共享同一个标志。
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
