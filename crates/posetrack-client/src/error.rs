//! 客户端层错误类型定义

use posetrack_backend::BackendError;
use thiserror::Error;

/// 客户端层错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    /// 外部服务错误
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// 没有配置 Environment 编码，无法开始追踪
    #[error("No environment code configured; tracking needs spatial reference data")]
    MissingEnvironment,

    /// 输出位姿失败
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// 是否应当终止进程
    pub fn is_fatal(&self) -> bool {
        match self {
            ClientError::Backend(e) => e.is_fatal(),
            ClientError::MissingEnvironment | ClientError::Io(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posetrack_protocol::{DeviceHandle, DeviceStatus};

    #[test]
    fn test_client_error_display() {
        let msg = ClientError::MissingEnvironment.to_string();
        assert!(msg.contains("environment"));

        let err: ClientError = BackendError::load("tracking", "not found").into();
        assert_eq!(
            err.to_string(),
            "Backend error: Failed to load tracking service: not found"
        );
    }

    #[test]
    fn test_fatality() {
        assert!(ClientError::MissingEnvironment.is_fatal());
        assert!(ClientError::from(BackendError::load("network", "x")).is_fatal());
        assert!(
            !ClientError::from(BackendError::DeviceNotIdle {
                device: DeviceHandle(1),
                status: DeviceStatus::Tracking,
            })
            .is_fatal()
        );
    }
}
