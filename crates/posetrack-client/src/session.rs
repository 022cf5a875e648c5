//! 追踪会话循环
//!
//! 会话未结束时：取一次外推位姿（固定 60 ms 外推），格式化输出，然后休眠固定间隔
//! （200 ms，即每秒最多 5 行）。循环结束后释放会话，且只释放一次。
//!
//! 会话由 [`SessionGuard`] 持有，drop 时自动释放，因此出错、panic 或被停止信号
//! 中断时也不会泄漏会话。

use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use posetrack_backend::TrackingSession;
use posetrack_protocol::{Placement, StabilityStage};
use tracing::{debug, trace};

use crate::error::ClientError;
use crate::report::format_reading;
use crate::signal::StopSignal;

/// 默认外推时长
pub const DEFAULT_HORIZON: Duration = Duration::from_millis(60);
/// 默认输出间隔（5 Hz）
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// 位姿来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoseSource {
    /// 外推位姿（应用 Placement 与外推时长）
    #[default]
    Extrapolated,
    /// 原始位姿
    Raw,
}

/// 会话循环配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// 外推时长
    pub horizon: Duration,
    /// 两次读数之间的休眠
    pub interval: Duration,
    /// 不输出处于惯性数据初始化阶段的读数（仍然消耗一个休眠周期）
    pub skip_initialization: bool,
    pub source: PoseSource,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            interval: DEFAULT_INTERVAL,
            skip_initialization: true,
            source: PoseSource::Extrapolated,
        }
    }
}

/// 会话循环统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    /// 输出的行数
    pub emitted: u64,
    /// 被初始化阶段过滤掉的读数
    pub skipped: u64,
    /// 是否被停止信号中断
    pub interrupted: bool,
}

/// 持有会话并保证只释放一次
pub struct SessionGuard<S: TrackingSession> {
    session: S,
    released: bool,
}

impl<S: TrackingSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            released: false,
        }
    }

    /// 立即释放会话
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.session.release();
            debug!("Tracking session released");
        }
    }
}

impl<S: TrackingSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: TrackingSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: TrackingSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.release_once();
    }
}

/// 运行会话直到结束
pub fn run_session<S, W>(
    session: S,
    placement: &Placement,
    config: &SessionConfig,
    out: &mut W,
) -> Result<SessionSummary, ClientError>
where
    S: TrackingSession,
    W: Write + ?Sized,
{
    run_session_until(session, placement, config, out, &StopSignal::new())
}

/// 运行会话直到结束或 `stop` 被触发
pub fn run_session_until<S, W>(
    session: S,
    placement: &Placement,
    config: &SessionConfig,
    out: &mut W,
    stop: &StopSignal,
) -> Result<SessionSummary, ClientError>
where
    S: TrackingSession,
    W: Write + ?Sized,
{
    let mut guard = SessionGuard::new(session);
    let mut summary = SessionSummary::default();

    while !guard.is_finished() {
        if stop.is_raised() {
            summary.interrupted = true;
            break;
        }

        let reading = match config.source {
            PoseSource::Extrapolated => guard.extrapolated_pose(placement, config.horizon),
            PoseSource::Raw => guard.raw_pose(),
        };

        if config.skip_initialization && reading.stage == StabilityStage::InertialDataInitialization
        {
            trace!("Skipping reading during inertial data initialization");
            summary.skipped += 1;
        } else {
            writeln!(out, "{}", format_reading(&reading))?;
            summary.emitted += 1;
        }

        if !config.interval.is_zero() {
            spin_sleep::sleep(config.interval);
        }
    }

    out.flush()?;
    guard.release();
    debug!(
        "Session loop finished: {} emitted, {} skipped{}",
        summary.emitted,
        summary.skipped,
        if summary.interrupted { " (interrupted)" } else { "" }
    );
    Ok(summary)
}
