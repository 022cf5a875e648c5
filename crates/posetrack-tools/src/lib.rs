//! # Posetrack Tools
//!
//! 应用层共享工具：
//!
//! - [`settings`]: TOML 配置文件（网络过滤器、会话节拍、SDK 日志级别）
//! - [`store`]: 基于配置文件的本地配置存储（实现 `ConfigStore`）

pub mod settings;
pub mod store;

pub use settings::{
    NetworkSettings, SdkSettings, SessionSettings, Settings, SettingsError, default_settings_path,
};
pub use store::FileConfigStore;
