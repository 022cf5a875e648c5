//! 节点获取循环
//!
//! 网络没有推送机制，只能轮询修订号。修订号不变时让出时间片并短暂退避；
//! 变化时重新枚举追踪子系统支持的设备，按枚举顺序选出第一个空闲设备。
//!
//! 上次观察到的修订号保存在 [`NodeAcquisition`] 中，跨多次调用保持，
//! 因此会话结束后再次获取时只会在新的变化上重新扫描。

use std::thread;
use std::time::Duration;

use posetrack_backend::{DeviceNetwork, SessionFactory};
use posetrack_protocol::{DeviceHandle, Revision};
use tracing::{debug, trace};

use crate::signal::StopSignal;

/// 轮询配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// 修订号不变时，让出时间片后额外等待的时间（0 表示只让出）
    pub backoff: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            backoff: Duration::from_millis(1),
        }
    }
}

/// 单次轮询结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// 修订号未变化，没有扫描
    Unchanged,
    /// 修订号变化，扫描了一次；包含找到的空闲设备（如果有）
    Scanned(Option<DeviceHandle>),
}

/// 节点获取状态
#[derive(Debug, Clone, Default)]
pub struct NodeAcquisition {
    last_revision: Revision,
    scans: u64,
    config: PollConfig,
}

impl NodeAcquisition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PollConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// 上次观察到的修订号
    pub fn last_revision(&self) -> Revision {
        self.last_revision
    }

    /// 累计扫描次数
    pub fn scans(&self) -> u64 {
        self.scans
    }

    /// 执行一次轮询
    pub fn poll_once<N, F>(&mut self, network: &N, factory: &F) -> PollOutcome
    where
        N: DeviceNetwork + ?Sized,
        F: SessionFactory + ?Sized,
    {
        let current = network.revision();
        if current == self.last_revision {
            return PollOutcome::Unchanged;
        }

        debug!(
            "Network revision changed {} -> {}, rescanning devices",
            self.last_revision, current
        );
        self.last_revision = current;
        self.scans += 1;

        let found = factory
            .supported_devices()
            .into_iter()
            .filter(|device| device.is_some())
            .find(|&device| {
                let status = network.device_status(device);
                trace!("Device {} status: {}", device, status);
                status.is_idle()
            });

        match found {
            Some(device) => debug!("Selected idle device {}", device),
            None => debug!("No idle device at revision {}", current),
        }
        PollOutcome::Scanned(found)
    }

    /// 阻塞直到找到一个空闲设备
    ///
    /// 没有超时：只有找到设备时才返回。
    pub fn wait_for_idle_device<N, F>(&mut self, network: &N, factory: &F) -> DeviceHandle
    where
        N: DeviceNetwork + ?Sized,
        F: SessionFactory + ?Sized,
    {
        loop {
            match self.poll_once(network, factory) {
                PollOutcome::Scanned(Some(device)) => return device,
                PollOutcome::Scanned(None) => {},
                PollOutcome::Unchanged => self.idle(),
            }
        }
    }

    /// 与 [`wait_for_idle_device`](Self::wait_for_idle_device) 相同，但在 `stop` 触发时返回 `None`
    pub fn wait_for_idle_device_until<N, F>(
        &mut self,
        network: &N,
        factory: &F,
        stop: &StopSignal,
    ) -> Option<DeviceHandle>
    where
        N: DeviceNetwork + ?Sized,
        F: SessionFactory + ?Sized,
    {
        loop {
            if stop.is_raised() {
                debug!("Device acquisition interrupted");
                return None;
            }
            match self.poll_once(network, factory) {
                PollOutcome::Scanned(Some(device)) => return Some(device),
                PollOutcome::Scanned(None) => {},
                PollOutcome::Unchanged => self.idle(),
            }
        }
    }

    fn idle(&self) {
        thread::yield_now();
        if !self.config.backoff.is_zero() {
            thread::sleep(self.config.backoff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posetrack_backend::{BackendError, TrackingSession};
    use posetrack_protocol::{
        DeviceProperty, DeviceStatus, Environment, Placement, PoseReading,
    };
    use std::cell::Cell;

    /// 固定修订号、固定设备列表的网络
    struct StaticNetwork {
        revision: Cell<Revision>,
        devices: Vec<(DeviceHandle, DeviceStatus)>,
        enumerations: Cell<u32>,
    }

    impl StaticNetwork {
        fn new(revision: Revision, devices: Vec<(DeviceHandle, DeviceStatus)>) -> Self {
            Self {
                revision: Cell::new(revision),
                devices,
                enumerations: Cell::new(0),
            }
        }
    }

    impl DeviceNetwork for StaticNetwork {
        fn revision(&self) -> Revision {
            self.revision.get()
        }

        fn device_status(&self, device: DeviceHandle) -> DeviceStatus {
            self.devices
                .iter()
                .find(|(d, _)| *d == device)
                .map(|(_, s)| *s)
                .unwrap_or(DeviceStatus::Unknown)
        }

        fn string_property(&self, _: DeviceHandle, _: DeviceProperty) -> Option<String> {
            None
        }
    }

    struct NoSession;

    impl TrackingSession for NoSession {
        fn is_finished(&self) -> bool {
            true
        }
        fn raw_pose(&mut self) -> PoseReading {
            unreachable!()
        }
        fn extrapolated_pose(&mut self, _: &Placement, _: Duration) -> PoseReading {
            unreachable!()
        }
        fn release(&mut self) {}
    }

    impl SessionFactory for StaticNetwork {
        type Session = NoSession;

        fn supported_devices(&self) -> Vec<DeviceHandle> {
            self.enumerations.set(self.enumerations.get() + 1);
            self.devices.iter().map(|(d, _)| *d).collect()
        }

        fn start(&self, _: DeviceHandle, _: &Environment) -> Result<NoSession, BackendError> {
            Ok(NoSession)
        }
    }

    #[test]
    fn test_unchanged_revision_does_not_scan() {
        let net = StaticNetwork::new(0, vec![(DeviceHandle(1), DeviceStatus::Idle)]);
        let mut acq = NodeAcquisition::new();

        for _ in 0..5 {
            assert_eq!(acq.poll_once(&net, &net), PollOutcome::Unchanged);
        }
        assert_eq!(net.enumerations.get(), 0);
        assert_eq!(acq.scans(), 0);
    }

    #[test]
    fn test_first_idle_in_enumeration_order() {
        let net = StaticNetwork::new(
            3,
            vec![
                (DeviceHandle(5), DeviceStatus::Tracking),
                (DeviceHandle(6), DeviceStatus::Idle),
                (DeviceHandle(7), DeviceStatus::Idle),
            ],
        );
        let mut acq = NodeAcquisition::new();

        assert_eq!(
            acq.poll_once(&net, &net),
            PollOutcome::Scanned(Some(DeviceHandle(6)))
        );
        assert_eq!(acq.last_revision(), 3);
        assert_eq!(acq.poll_once(&net, &net), PollOutcome::Unchanged);
        assert_eq!(net.enumerations.get(), 1);
    }

    #[test]
    fn test_sentinel_handle_is_never_selected() {
        let net = StaticNetwork::new(
            1,
            vec![
                (DeviceHandle::NONE, DeviceStatus::Idle),
                (DeviceHandle(2), DeviceStatus::Idle),
            ],
        );
        let mut acq = NodeAcquisition::new();
        assert_eq!(
            acq.poll_once(&net, &net),
            PollOutcome::Scanned(Some(DeviceHandle(2)))
        );
    }

    #[test]
    fn test_wait_returns_none_when_stopped() {
        let net = StaticNetwork::new(1, vec![(DeviceHandle(1), DeviceStatus::Booting)]);
        let mut acq = NodeAcquisition::with_config(PollConfig {
            backoff: Duration::ZERO,
        });
        let stop = StopSignal::new();

        // 第一次扫描找不到空闲设备，之后修订号不变
        assert_eq!(acq.poll_once(&net, &net), PollOutcome::Scanned(None));
        stop.raise();
        assert_eq!(acq.wait_for_idle_device_until(&net, &net, &stop), None);
        assert_eq!(net.enumerations.get(), 1);
    }

    #[test]
    fn test_wait_blocks_until_revision_changes() {
        let net = StaticNetwork::new(2, vec![(DeviceHandle(9), DeviceStatus::Idle)]);
        let mut acq = NodeAcquisition::with_config(PollConfig {
            backoff: Duration::ZERO,
        });
        assert_eq!(acq.wait_for_idle_device(&net, &net), DeviceHandle(9));
        assert_eq!(acq.scans(), 1);
    }
}
