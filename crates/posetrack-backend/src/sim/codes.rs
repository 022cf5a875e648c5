//! 模拟后端使用的 Environment / Placement 编码
//!
//! - Environment: `id@x,y,z|id@x,y,z|...`
//! - Placement: `x,y,z;qx,qy,qz,qw`

use std::collections::HashSet;

use posetrack_protocol::{Environment, Marker, Placement, Position, Rotation};

use crate::BackendError;

fn invalid(kind: &'static str, reason: impl Into<String>) -> BackendError {
    BackendError::InvalidCode {
        kind,
        reason: reason.into(),
    }
}

fn parse_floats<const N: usize>(kind: &'static str, text: &str) -> Result<[f64; N], BackendError> {
    let mut out = [0.0; N];
    let mut parts = text.split(',');
    for slot in out.iter_mut() {
        let part = parts
            .next()
            .ok_or_else(|| invalid(kind, format!("expected {} components in {:?}", N, text)))?;
        let value: f64 = part
            .trim()
            .parse()
            .map_err(|_| invalid(kind, format!("not a number: {:?}", part.trim())))?;
        if !value.is_finite() {
            return Err(invalid(kind, format!("non-finite value {:?}", part.trim())));
        }
        *slot = value;
    }
    if parts.next().is_some() {
        return Err(invalid(
            kind,
            format!("expected {} components in {:?}", N, text),
        ));
    }
    Ok(out)
}

pub fn parse_environment(code: &str) -> Result<Environment, BackendError> {
    const KIND: &str = "environment";

    let code = code.trim();
    if code.is_empty() {
        return Err(invalid(KIND, "empty code"));
    }

    let mut seen = HashSet::new();
    let mut markers = Vec::new();
    for entry in code.split('|') {
        let (id, coords) = entry
            .split_once('@')
            .ok_or_else(|| invalid(KIND, format!("missing '@' in {:?}", entry)))?;
        let id: u32 = id
            .trim()
            .parse()
            .map_err(|_| invalid(KIND, format!("bad marker id {:?}", id.trim())))?;
        if !seen.insert(id) {
            return Err(invalid(KIND, format!("duplicate marker id {}", id)));
        }
        let [x, y, z] = parse_floats::<3>(KIND, coords)?;
        markers.push(Marker {
            id,
            position: Position::new(x, y, z),
        });
    }

    Ok(Environment::new(markers))
}

pub fn parse_placement(code: &str) -> Result<Placement, BackendError> {
    const KIND: &str = "placement";

    let (position, rotation) = code
        .trim()
        .split_once(';')
        .ok_or_else(|| invalid(KIND, "expected \"x,y,z;qx,qy,qz,qw\""))?;
    let [x, y, z] = parse_floats::<3>(KIND, position)?;
    let [qx, qy, qz, qw] = parse_floats::<4>(KIND, rotation)?;

    let norm = (qx * qx + qy * qy + qz * qz + qw * qw).sqrt();
    if norm < 1e-9 {
        return Err(invalid(KIND, "zero-length quaternion"));
    }

    Ok(Placement::new(
        Position::new(x, y, z),
        Rotation::new(qx, qy, qz, qw),
    ))
}

/// 生成 `parse_placement` 可读取的编码
pub fn encode_placement(placement: &Placement) -> String {
    let p = placement.position;
    let r = placement.rotation;
    format!("{},{},{};{},{},{},{}", p.x, p.y, p.z, r.x, r.y, r.z, r.w)
}
