//! Info-panel text formatting. Every readout shows one decimal place.

use kurbo::Point;

/// One decimal place, with negative zero shown as `0.0`.
pub fn format_scalar(v: f64) -> String {
    let s = format!("{v:.1}");
    if s == "-0.0" { "0.0".to_string() } else { s }
}

/// `(x.x, y.y)`
pub fn format_pair(p: Point) -> String {
    format!("({}, {})", format_scalar(p.x), format_scalar(p.y))
}

/// Scale factor, e.g. `1.5x`.
pub fn format_factor(v: f64) -> String {
    format!("{}x", format_scalar(v))
}

/// Angle in degrees, e.g. `-12.5°`.
pub fn format_degrees(v: f64) -> String {
    format!("{}°", format_scalar(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_decimal_place() {
        assert_eq!(format_pair(Point::new(3.0, 4.5)), "(3.0, 4.5)");
        assert_eq!(format_scalar(36.0), "36.0");
        assert_eq!(format_scalar(7.0710678), "7.1");
        assert_eq!(format_scalar(-0.04), "0.0");
        assert_eq!(format_scalar(-9.0), "-9.0");
        assert_eq!(format_factor(1.5), "1.5x");
        assert_eq!(format_degrees(0.0), "0.0°");
    }
}
