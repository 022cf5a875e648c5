//! # Posetrack Backend Layer
//!
//! 追踪 SDK 的服务抽象层。每个外部服务对应一个窄接口：
//!
//! - [`NetworkService`] / [`DeviceNetwork`]: 设备网络（修订号、设备状态、属性）
//! - [`TrackingService`] / [`SessionFactory`] / [`TrackingSession`]: 追踪任务
//! - [`SpatialService`]: Environment / Placement 构建
//! - [`ConfigStore`]: 本地配置存储
//!
//! 轮询逻辑只依赖这些 trait，因此可以用假实现测试，不需要真实设备。
//! `sim` feature 提供一个进程内的模拟后端。

use std::time::Duration;

use posetrack_protocol::{
    DeviceFilter, DeviceHandle, DeviceProperty, DeviceStatus, Environment, Marker, Placement,
    PoseReading, Revision, SdkVerbosity,
};

mod error;
mod store;

#[cfg(feature = "sim")]
pub mod sim;

pub use error::BackendError;
pub use store::MemoryConfigStore;

/// 设备网络服务
pub trait NetworkService {
    type Network: DeviceNetwork;

    fn set_log_verbosity(&self, verbosity: SdkVerbosity);

    /// 创建限定在 `filter` 范围内的网络
    fn create_network(&self, filter: DeviceFilter) -> Result<Self::Network, BackendError>;
}

/// 一个已创建的设备网络
///
/// 所有调用都是同步、非阻塞的。
pub trait DeviceNetwork {
    /// 当前网络修订号（拓扑或状态变化时递增）
    fn revision(&self) -> Revision;

    fn device_status(&self, device: DeviceHandle) -> DeviceStatus;

    fn string_property(&self, device: DeviceHandle, property: DeviceProperty) -> Option<String>;
}

/// 追踪服务
pub trait TrackingService {
    type Network: DeviceNetwork;
    type Factory: SessionFactory;

    fn set_log_verbosity(&self, verbosity: SdkVerbosity);

    /// 构建绑定到 `network` 的会话构造器
    fn session_factory(&self, network: &Self::Network) -> Result<Self::Factory, BackendError>;
}

/// 会话构造器
pub trait SessionFactory {
    type Session: TrackingSession;

    /// 追踪子系统在该网络上支持的设备（按枚举顺序）
    fn supported_devices(&self) -> Vec<DeviceHandle>;

    fn start(
        &self,
        device: DeviceHandle,
        environment: &Environment,
    ) -> Result<Self::Session, BackendError>;
}

/// 活动中的追踪任务
///
/// 完成后必须调用 `release()`；调用方保证只调用一次。
pub trait TrackingSession {
    fn is_finished(&self) -> bool;

    fn raw_pose(&mut self) -> PoseReading;

    /// 以 `placement` 变换后、向前外推 `horizon` 的位姿
    fn extrapolated_pose(&mut self, placement: &Placement, horizon: Duration) -> PoseReading;

    fn release(&mut self);
}

/// Environment / Placement 构建服务
pub trait SpatialService {
    fn environment_from_code(&self, code: &str) -> Result<Environment, BackendError>;

    fn placement_from_code(&self, code: &str) -> Result<Placement, BackendError>;

    fn markers(&self, environment: &Environment) -> Vec<Marker> {
        environment.markers().to_vec()
    }
}

/// 本地配置存储服务
pub trait ConfigStore {
    /// 读取命名字符串值，不存在时返回 `default`
    fn read_string(&self, key: &str, default: &str) -> String;
}

impl<T: ConfigStore + ?Sized> ConfigStore for &T {
    fn read_string(&self, key: &str, default: &str) -> String {
        (**self).read_string(key, default)
    }
}
