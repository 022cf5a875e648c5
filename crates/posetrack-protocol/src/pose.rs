//! 位姿读数与稳定阶段

use std::fmt;

use num_enum::TryFromPrimitive;

use crate::ProtocolError;
use crate::spatial::{Position, Rotation};

/// 追踪稳定阶段
///
/// 会话启动后先完成惯性数据初始化，然后收敛到稳定状态。
/// 光学参考丢失时进入 `Degraded`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum StabilityStage {
    InertialDataInitialization = 0,
    Converging = 1,
    Stable = 2,
    Degraded = 3,
}

impl StabilityStage {
    pub fn from_code(code: u8) -> Result<Self, ProtocolError> {
        Self::try_from(code).map_err(|_| ProtocolError::UnknownStage(code))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::InertialDataInitialization => "inertial data initialization",
            Self::Converging => "converging",
            Self::Stable => "stable",
            Self::Degraded => "degraded",
        }
    }
}

impl fmt::Display for StabilityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 一次位姿 + 稳定度读数
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoseReading {
    pub stage: StabilityStage,
    pub position: Position,
    pub rotation: Rotation,
}

impl PoseReading {
    pub fn new(stage: StabilityStage, position: Position, rotation: Rotation) -> Self {
        Self {
            stage,
            position,
            rotation,
        }
    }
}
