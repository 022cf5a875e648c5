//! 后端层错误类型定义

use posetrack_protocol::{DeviceHandle, DeviceStatus, ProtocolError};
use thiserror::Error;

/// 后端层统一错误类型
#[derive(Error, Debug)]
pub enum BackendError {
    /// 服务加载/初始化失败
    #[error("Failed to load {service} service: {reason}")]
    Load {
        service: &'static str,
        reason: String,
    },

    #[error("Device {0} not found")]
    DeviceNotFound(DeviceHandle),

    #[error("Device {device} is {status}, expected idle")]
    DeviceNotIdle {
        device: DeviceHandle,
        status: DeviceStatus,
    },

    /// 同一时间只允许一个追踪任务
    #[error("A tracking session is already active on device {0}")]
    SessionActive(DeviceHandle),

    /// 编码无法解析（kind: "environment" / "placement"）
    #[error("Invalid {kind} code: {reason}")]
    InvalidCode { kind: &'static str, reason: String },

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    pub fn load(service: &'static str, reason: impl Into<String>) -> Self {
        Self::Load {
            service,
            reason: reason.into(),
        }
    }

    /// 是否为加载失败（进程应当终止）
    pub fn is_fatal(&self) -> bool {
        matches!(self, BackendError::Load { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::load("tracking", "symbol table mismatch");
        assert_eq!(
            err.to_string(),
            "Failed to load tracking service: symbol table mismatch"
        );
        assert!(err.is_fatal());

        let err = BackendError::DeviceNotIdle {
            device: DeviceHandle(3),
            status: DeviceStatus::Tracking,
        };
        assert_eq!(err.to_string(), "Device #0003 is tracking, expected idle");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_from_protocol_error() {
        let err: BackendError = ProtocolError::UnknownStatus(9).into();
        match err {
            BackendError::Protocol(ProtocolError::UnknownStatus(code)) => assert_eq!(code, 9),
            _ => panic!("Expected Protocol variant"),
        }
    }
}
