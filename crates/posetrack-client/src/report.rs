//! 位姿行格式化
//!
//! 数值按有效数字输出（与 C 的 `%g` 相同的规则）：先按 P-1 位精度做科学计数
//! 转换得到指数 X，`-4 <= X < P` 时用 P-1-X 位小数的定点表示，否则用科学计数，
//! 两种情况都去掉尾随的 0。

use posetrack_protocol::PoseReading;

/// 每个分量输出的有效数字位数
pub const SIGNIFICANT_DIGITS: usize = 5;

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// 按 `digits` 位有效数字格式化
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }

    let digits = digits.max(1);
    // -0.0 统一输出为 0
    let value = if value == 0.0 { 0.0 } else { value };

    let sci = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// 格式化一行位姿输出：稳定阶段、位置 (x,y,z)、姿态 (x,y,z,w)
pub fn format_reading(reading: &PoseReading) -> String {
    let f = |v: f64| format_significant(v, SIGNIFICANT_DIGITS);
    let p = reading.position;
    let r = reading.rotation;
    format!(
        "[{}] pos: ({}, {}, {}) rot: ({}, {}, {}, {})",
        reading.stage,
        f(p.x),
        f(p.y),
        f(p.z),
        f(r.x),
        f(r.y),
        f(r.z),
        f(r.w)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use posetrack_protocol::{Position, Rotation, StabilityStage};

    #[test]
    fn test_fixed_notation() {
        assert_eq!(format_significant(1.0, 5), "1");
        assert_eq!(format_significant(0.0, 5), "0");
        assert_eq!(format_significant(-0.0, 5), "0");
        assert_eq!(format_significant(0.123456, 5), "0.12346");
        assert_eq!(format_significant(123.456, 5), "123.46");
        assert_eq!(format_significant(-0.5, 5), "-0.5");
        assert_eq!(format_significant(12345.0, 5), "12345");
        assert_eq!(format_significant(0.0001, 5), "0.0001");
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(format_significant(123456.0, 5), "1.2346e+05");
        assert_eq!(format_significant(0.00001234, 5), "1.234e-05");
        assert_eq!(format_significant(-0.00001, 5), "-1e-05");
    }

    #[test]
    fn test_rounding_carries_into_exponent() {
        // 9.99996 四舍五入为 10.000，指数从 0 变为 1
        assert_eq!(format_significant(9.99996, 5), "10");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_significant(f64::NAN, 5), "nan");
        assert_eq!(format_significant(f64::NEG_INFINITY, 5), "-inf");
    }

    #[test]
    fn test_format_reading() {
        let reading = PoseReading::new(
            StabilityStage::Stable,
            Position::new(0.25, -1.5, 1.0),
            Rotation::new(0.0, 0.0, 0.70710678, 0.70710678),
        );
        assert_eq!(
            format_reading(&reading),
            "[stable] pos: (0.25, -1.5, 1) rot: (0, 0, 0.70711, 0.70711)"
        );
    }
}
