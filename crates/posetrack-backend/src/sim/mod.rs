//! 进程内模拟后端
//!
//! 在没有真实追踪 SDK 的情况下实现全部服务接口：
//!
//! - 每次读取修订号推进一次模拟时钟，正在启动的设备倒计时结束后变为空闲
//! - 启动会话、释放会话、设备启动完成都会使修订号递增
//! - 会话读数依次经过惯性初始化、收敛、稳定阶段
//!
//! 网络、会话构造器和会话共享同一份状态（`Arc<Mutex<SimState>>`）。

pub mod codes;
pub mod motion;
pub mod scenario;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use posetrack_protocol::{
    DeviceFilter, DeviceHandle, DeviceProperty, DeviceStatus, Environment, Placement,
    PoseReading, Revision, SdkVerbosity, StabilityStage,
};
use tracing::{debug, info, trace};

use crate::{
    BackendError, DeviceNetwork, NetworkService, SessionFactory, SpatialService, TrackingService,
    TrackingSession,
};

pub use scenario::{SIM_PRODUCT_ID, SIM_VENDOR_ID, SimDevice, SimScenario};

/// 模拟时钟步长：每个读数对应的时间
pub const READING_PERIOD: Duration = Duration::from_millis(200);

#[derive(Debug)]
struct SimDeviceState {
    profile: SimDevice,
    status: DeviceStatus,
    boot_polls_left: u32,
}

#[derive(Debug)]
struct SimState {
    revision: Revision,
    devices: Vec<SimDeviceState>,
    active: Option<DeviceHandle>,
    verbosity: SdkVerbosity,
    radius: f64,
    initialization_readings: u32,
    sessions_started: u64,
}

impl SimState {
    fn device(&self, handle: DeviceHandle) -> Option<&SimDeviceState> {
        self.devices.iter().find(|d| d.profile.id == handle.0)
    }

    fn device_mut(&mut self, handle: DeviceHandle) -> Option<&mut SimDeviceState> {
        self.devices.iter_mut().find(|d| d.profile.id == handle.0)
    }

    fn bump(&mut self, reason: &str) {
        self.revision += 1;
        if self.verbosity >= SdkVerbosity::Debug {
            debug!(revision = self.revision, "sim network revision bumped: {}", reason);
        }
    }

    /// 推进启动倒计时
    fn tick(&mut self) {
        let mut finished = Vec::new();
        for device in &mut self.devices {
            if device.status == DeviceStatus::Booting && device.boot_polls_left > 0 {
                device.boot_polls_left -= 1;
                if device.boot_polls_left == 0 {
                    device.status = DeviceStatus::Idle;
                    finished.push(device.profile.serial.clone());
                }
            }
        }
        for serial in finished {
            self.bump(&format!("{} finished booting", serial));
        }
    }
}

/// 模拟后端（同时实现网络、追踪和空间服务）
#[derive(Debug, Clone)]
pub struct SimBackend {
    state: Arc<Mutex<SimState>>,
}

impl SimBackend {
    /// 加载模拟服务
    ///
    /// 场景不可用或不合法时返回 `BackendError::Load`。
    pub fn load(scenario: SimScenario) -> Result<Self, BackendError> {
        if !scenario.available {
            return Err(BackendError::load(
                "network",
                "simulated SDK marked unavailable by scenario",
            ));
        }
        scenario
            .validate()
            .map_err(|e| BackendError::load("network", e.to_string()))?;

        let devices = scenario
            .devices
            .into_iter()
            .map(|profile| {
                let status = if profile.boot_polls > 0 {
                    DeviceStatus::Booting
                } else {
                    profile.status
                };
                SimDeviceState {
                    boot_polls_left: profile.boot_polls,
                    status,
                    profile,
                }
            })
            .collect::<Vec<_>>();

        info!("Simulated tracking SDK loaded with {} device(s)", devices.len());

        Ok(Self {
            state: Arc::new(Mutex::new(SimState {
                // 设备在加载时出现，因此修订号从 1 开始
                revision: 1,
                devices,
                active: None,
                verbosity: SdkVerbosity::default(),
                radius: scenario.radius_m,
                initialization_readings: scenario.initialization_readings,
                sessions_started: 0,
            })),
        })
    }

    /// 已启动的会话总数
    pub fn sessions_started(&self) -> u64 {
        self.state.lock().sessions_started
    }

    /// 当前活动会话所在设备
    pub fn active_device(&self) -> Option<DeviceHandle> {
        self.state.lock().active
    }

    /// 外部修改设备状态（测试用），会使修订号递增
    pub fn set_device_status(
        &self,
        device: DeviceHandle,
        status: DeviceStatus,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        let entry = state
            .device_mut(device)
            .ok_or(BackendError::DeviceNotFound(device))?;
        if entry.status != status {
            entry.status = status;
            entry.boot_polls_left = 0;
            state.bump("status changed externally");
        }
        Ok(())
    }
}

impl NetworkService for SimBackend {
    type Network = SimNetwork;

    fn set_log_verbosity(&self, verbosity: SdkVerbosity) {
        self.state.lock().verbosity = verbosity;
    }

    fn create_network(&self, filter: DeviceFilter) -> Result<SimNetwork, BackendError> {
        debug!("Creating simulated network with filter {}", filter);
        Ok(SimNetwork {
            state: Arc::clone(&self.state),
            filter,
        })
    }
}

impl TrackingService for SimBackend {
    type Network = SimNetwork;
    type Factory = SimSessionFactory;

    fn set_log_verbosity(&self, verbosity: SdkVerbosity) {
        self.state.lock().verbosity = verbosity;
    }

    fn session_factory(&self, network: &SimNetwork) -> Result<SimSessionFactory, BackendError> {
        Ok(SimSessionFactory {
            state: Arc::clone(&network.state),
            filter: network.filter,
        })
    }
}

impl SpatialService for SimBackend {
    fn environment_from_code(&self, code: &str) -> Result<Environment, BackendError> {
        codes::parse_environment(code)
    }

    fn placement_from_code(&self, code: &str) -> Result<Placement, BackendError> {
        codes::parse_placement(code)
    }
}

/// 模拟设备网络
#[derive(Debug, Clone)]
pub struct SimNetwork {
    state: Arc<Mutex<SimState>>,
    filter: DeviceFilter,
}

impl SimNetwork {
    fn visible(&self, profile: &SimDevice) -> bool {
        self.filter.matches(profile.vendor_id, profile.product_id)
    }
}

impl DeviceNetwork for SimNetwork {
    fn revision(&self) -> Revision {
        let mut state = self.state.lock();
        state.tick();
        state.revision
    }

    fn device_status(&self, device: DeviceHandle) -> DeviceStatus {
        let state = self.state.lock();
        match state.device(device) {
            Some(d) if self.visible(&d.profile) => d.status,
            _ => DeviceStatus::Unknown,
        }
    }

    fn string_property(&self, device: DeviceHandle, property: DeviceProperty) -> Option<String> {
        let state = self.state.lock();
        let d = state.device(device).filter(|d| self.visible(&d.profile))?;
        Some(match property {
            DeviceProperty::SerialNumber => d.profile.serial.clone(),
            DeviceProperty::ProductName => d.profile.product_name.clone(),
            DeviceProperty::FirmwareVersion => d.profile.firmware.clone(),
        })
    }
}

/// 模拟会话构造器
#[derive(Debug, Clone)]
pub struct SimSessionFactory {
    state: Arc<Mutex<SimState>>,
    filter: DeviceFilter,
}

impl SessionFactory for SimSessionFactory {
    type Session = SimSession;

    fn supported_devices(&self) -> Vec<DeviceHandle> {
        let state = self.state.lock();
        state
            .devices
            .iter()
            .filter(|d| d.profile.tracking_capable)
            .filter(|d| self.filter.matches(d.profile.vendor_id, d.profile.product_id))
            .map(|d| DeviceHandle(d.profile.id))
            .collect()
    }

    fn start(
        &self,
        device: DeviceHandle,
        environment: &Environment,
    ) -> Result<SimSession, BackendError> {
        let mut state = self.state.lock();
        if let Some(active) = state.active {
            return Err(BackendError::SessionActive(active));
        }

        let entry = state
            .device_mut(device)
            .filter(|d| d.profile.tracking_capable)
            .ok_or(BackendError::DeviceNotFound(device))?;
        if !entry.status.is_idle() {
            return Err(BackendError::DeviceNotIdle {
                device,
                status: entry.status,
            });
        }
        entry.status = DeviceStatus::Tracking;
        let length = entry.profile.session_length;
        let serial = entry.profile.serial.clone();

        state.active = Some(device);
        state.sessions_started += 1;
        state.bump("session started");

        info!(
            "Simulated session started on {} ({} marker(s), {} reading(s))",
            serial,
            environment.markers().len(),
            length
        );

        Ok(SimSession {
            state: Arc::clone(&self.state),
            device,
            length,
            readings: 0,
            radius: state.radius,
            initialization_readings: state.initialization_readings,
            released: false,
        })
    }
}

/// 模拟追踪会话
///
/// 产生 `session_length` 个读数后结束。drop 时如果尚未释放会自动释放。
#[derive(Debug)]
pub struct SimSession {
    state: Arc<Mutex<SimState>>,
    device: DeviceHandle,
    length: u32,
    readings: u32,
    radius: f64,
    initialization_readings: u32,
    released: bool,
}

impl SimSession {
    pub fn device(&self) -> DeviceHandle {
        self.device
    }

    pub fn readings(&self) -> u32 {
        self.readings
    }

    fn stage(&self) -> StabilityStage {
        let init = self.initialization_readings;
        if self.readings <= init {
            StabilityStage::InertialDataInitialization
        } else if self.readings <= init + 2 {
            StabilityStage::Converging
        } else {
            StabilityStage::Stable
        }
    }

    fn next_reading(&mut self, placement: &Placement, horizon: Duration) -> PoseReading {
        self.readings += 1;
        let t = READING_PERIOD * self.readings;
        let (position, rotation) = motion::extrapolate(self.radius, t, horizon, placement);
        let reading = PoseReading::new(self.stage(), position, rotation);
        trace!(device = %self.device, readings = self.readings, "sim reading {:?}", reading);
        reading
    }
}

impl TrackingSession for SimSession {
    fn is_finished(&self) -> bool {
        self.released || self.readings >= self.length
    }

    fn raw_pose(&mut self) -> PoseReading {
        self.next_reading(&Placement::IDENTITY, Duration::ZERO)
    }

    fn extrapolated_pose(&mut self, placement: &Placement, horizon: Duration) -> PoseReading {
        self.next_reading(placement, horizon)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let mut state = self.state.lock();
        if let Some(entry) = state.device_mut(self.device) {
            entry.status = DeviceStatus::Idle;
        }
        if state.active == Some(self.device) {
            state.active = None;
        }
        state.bump("session released");
    }
}

impl Drop for SimSession {
    fn drop(&mut self) {
        self.release();
    }
}
