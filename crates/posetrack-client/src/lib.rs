//! # Posetrack Client
//!
//! 追踪 SDK 的轮询客户端：
//!
//! - [`acquisition`]: 节点获取循环（监视网络修订号，选出第一个空闲设备）
//! - [`session`]: 追踪会话循环（按固定节拍输出外推位姿，结束后释放会话）
//! - [`setup`]: 从配置存储构建 Environment / Placement
//! - [`tracker`]: 外层循环，获取设备 → 运行会话 → 再次获取
//!
//! 所有外部服务都通过 `posetrack-backend` 的 trait 注入。
//!
//! # 示例
//!
//! ```rust,no_run
//! use posetrack_backend::sim::{SimBackend, SimScenario};
//! use posetrack_backend::{MemoryConfigStore, NetworkService, TrackingService};
//! use posetrack_client::{StopSignal, Tracker, setup};
//! use posetrack_protocol::DeviceFilter;
//!
//! let backend = SimBackend::load(SimScenario::default()).unwrap();
//! let store = MemoryConfigStore::new().with("environment", "1@0,0,2");
//! let network = backend.create_network(DeviceFilter::AllUsb).unwrap();
//! let factory = backend.session_factory(&network).unwrap();
//! let environment = setup::load_environment(&backend, &store).unwrap();
//! let placement = setup::resolve_placement(&backend, &store).unwrap();
//!
//! let mut tracker = Tracker::new(network, factory, environment, placement);
//! tracker
//!     .run(&mut std::io::stdout(), &StopSignal::new(), None)
//!     .unwrap();
//! ```

pub mod acquisition;
pub mod error;
pub mod report;
pub mod session;
pub mod setup;
pub mod signal;
pub mod tracker;

// 重新导出常用类型
pub use acquisition::{NodeAcquisition, PollConfig, PollOutcome};
pub use error::ClientError;
pub use report::{format_reading, format_significant};
pub use session::{
    PoseSource, SessionConfig, SessionGuard, SessionSummary, run_session, run_session_until,
};
pub use signal::StopSignal;
pub use tracker::{CycleOutcome, Tracker};
