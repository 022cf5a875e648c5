//! 模拟运动轨迹
//!
//! 设备在 1 m 高度绕 Z 轴做匀速圆周运动，朝向与切线方向一致。

use std::time::Duration;

use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};
use posetrack_protocol::{Placement, Position, Rotation};

/// 角速度（rad/s）
pub const ANGULAR_SPEED: f64 = 0.5;
/// 轨迹高度（米）
pub const HEIGHT_M: f64 = 1.0;

fn placement_isometry(placement: &Placement) -> Isometry3<f64> {
    let p = placement.position;
    let r = placement.rotation;
    Isometry3::from_parts(
        Translation3::new(p.x, p.y, p.z),
        UnitQuaternion::from_quaternion(Quaternion::new(r.w, r.x, r.y, r.z)),
    )
}

/// 时刻 `t` 的原始位姿
pub fn pose_at(radius: f64, t: Duration) -> Isometry3<f64> {
    let theta = ANGULAR_SPEED * t.as_secs_f64();
    Isometry3::from_parts(
        Translation3::new(radius * theta.cos(), radius * theta.sin(), HEIGHT_M),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), theta),
    )
}

/// 以 `placement` 变换并外推 `horizon` 后的位姿
pub fn extrapolate(
    radius: f64,
    t: Duration,
    horizon: Duration,
    placement: &Placement,
) -> (Position, Rotation) {
    let world = placement_isometry(placement) * pose_at(radius, t + horizon);
    split(&world)
}

pub fn split(iso: &Isometry3<f64>) -> (Position, Rotation) {
    let v = iso.translation.vector;
    // coords 顺序为 (i, j, k, w)
    let q = iso.rotation.quaternion().coords;
    (
        Position::new(v.x, v.y, v.z),
        Rotation::new(q[0], q[1], q[2], q[3]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_pose_at_origin() {
        let (pos, rot) = split(&pose_at(0.5, Duration::ZERO));
        assert!((pos.x - 0.5).abs() < EPS);
        assert!(pos.y.abs() < EPS);
        assert!((pos.z - HEIGHT_M).abs() < EPS);
        assert!((rot.w - 1.0).abs() < EPS);
    }

    #[test]
    fn test_identity_placement_is_noop() {
        let t = Duration::from_millis(1500);
        let (a, ra) = extrapolate(0.3, t, Duration::ZERO, &Placement::IDENTITY);
        let (b, rb) = split(&pose_at(0.3, t));
        assert!((a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS);
        assert!((ra.z - rb.z).abs() < EPS && (ra.w - rb.w).abs() < EPS);
    }

    #[test]
    fn test_horizon_moves_forward() {
        let t = Duration::from_secs(1);
        let (now, _) = extrapolate(1.0, t, Duration::ZERO, &Placement::IDENTITY);
        let (ahead, _) = extrapolate(1.0, t, Duration::from_millis(60), &Placement::IDENTITY);
        assert!(ahead.y > now.y);
    }

    #[test]
    fn test_placement_translation() {
        let placement = Placement::new(Position::new(0.0, 0.0, -1.0), Rotation::IDENTITY);
        let (pos, _) = extrapolate(0.0, Duration::ZERO, Duration::ZERO, &placement);
        assert!(pos.z.abs() < EPS);
    }
}
