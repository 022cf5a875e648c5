//! 外层循环：获取设备 → 运行会话 → 再次获取
//!
//! 同一时间最多一个会话：只有上一个会话结束并释放后才会寻找下一个空闲设备。

use std::io::Write;

use posetrack_backend::{DeviceNetwork, SessionFactory};
use posetrack_protocol::{DeviceProperty, Environment, Placement};
use tracing::{info, warn};

use crate::acquisition::{NodeAcquisition, PollConfig};
use crate::error::ClientError;
use crate::session::{SessionConfig, SessionSummary, run_session_until};
use crate::signal::StopSignal;

/// 一轮循环的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 会话运行结束
    Completed(SessionSummary),
    /// 设备在扫描和启动之间变为不可用，等待下一次修订号变化
    StartFailed,
    /// 停止信号触发
    Stopped,
}

/// 追踪客户端
pub struct Tracker<N, F>
where
    N: DeviceNetwork,
    F: SessionFactory,
{
    network: N,
    factory: F,
    environment: Environment,
    placement: Placement,
    acquisition: NodeAcquisition,
    session_config: SessionConfig,
}

impl<N, F> Tracker<N, F>
where
    N: DeviceNetwork,
    F: SessionFactory,
{
    pub fn new(network: N, factory: F, environment: Environment, placement: Placement) -> Self {
        Self {
            network,
            factory,
            environment,
            placement,
            acquisition: NodeAcquisition::new(),
            session_config: SessionConfig::default(),
        }
    }

    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.acquisition = NodeAcquisition::with_config(config);
        self
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn acquisition(&self) -> &NodeAcquisition {
        &self.acquisition
    }

    /// 运行一轮：等待空闲设备，启动会话，直到会话结束
    pub fn run_cycle<W>(&mut self, out: &mut W, stop: &StopSignal) -> Result<CycleOutcome, ClientError>
    where
        W: Write + ?Sized,
    {
        let Some(device) =
            self.acquisition
                .wait_for_idle_device_until(&self.network, &self.factory, stop)
        else {
            return Ok(CycleOutcome::Stopped);
        };

        let serial = self
            .network
            .string_property(device, DeviceProperty::SerialNumber)
            .unwrap_or_else(|| "<unknown>".to_string());
        info!("Acquired idle device {} (serial {})", device, serial);

        let session = match self.factory.start(device, &self.environment) {
            Ok(session) => session,
            Err(e) if !e.is_fatal() => {
                warn!("Failed to start session on {}: {}", device, e);
                return Ok(CycleOutcome::StartFailed);
            },
            Err(e) => return Err(e.into()),
        };

        let summary =
            run_session_until(session, &self.placement, &self.session_config, out, stop)?;
        info!(
            "Session on {} finished ({} reading(s) printed)",
            serial, summary.emitted
        );

        if summary.interrupted {
            Ok(CycleOutcome::Stopped)
        } else {
            Ok(CycleOutcome::Completed(summary))
        }
    }

    /// 无限循环，直到 `stop` 被触发或完成 `max_sessions` 个会话
    ///
    /// 返回完成的会话数。
    pub fn run<W>(
        &mut self,
        out: &mut W,
        stop: &StopSignal,
        max_sessions: Option<u64>,
    ) -> Result<u64, ClientError>
    where
        W: Write + ?Sized,
    {
        let mut completed = 0;
        while max_sessions.is_none_or(|max| completed < max) {
            match self.run_cycle(out, stop)? {
                CycleOutcome::Completed(_) => completed += 1,
                CycleOutcome::StartFailed => {},
                CycleOutcome::Stopped => break,
            }
        }
        Ok(completed)
    }
}
