use serde::{Deserialize, Serialize};

/// Wind speed (m/s) at which the needle reaches the end of the arc
pub const GAUGE_MAX_SPEED: f64 = 30.0;

/// Needle angle in degrees for a wind speed.
///
/// Linear over 0..=30 m/s onto -90..=+90, clamped to that range.
pub fn needle_angle(speed: f64) -> f64 {
    let clamped = speed.clamp(0.0, GAUGE_MAX_SPEED);
    -90.0 + (clamped / GAUGE_MAX_SPEED) * 180.0
}

/// Wind gauge state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindGauge {
    pub speed: f64,
    pub angle: f64,
    pub label: String,
}

impl WindGauge {
    pub fn for_speed(speed: f64) -> Self {
        Self {
            speed,
            angle: needle_angle(speed),
            label: format!("{:.1} m/s", speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(needle_angle(0.0), -90.0);
        assert_eq!(needle_angle(15.0), 0.0);
        assert_eq!(needle_angle(30.0), 90.0);
    }

    #[test]
    fn test_clamped_above_max() {
        assert_eq!(needle_angle(31.0), 90.0);
        assert_eq!(needle_angle(120.0), 90.0);
    }

    #[test]
    fn test_negative_speed_stays_on_arc() {
        assert_eq!(needle_angle(-5.0), -90.0);
        assert_eq!(WindGauge::for_speed(-0.5).angle, -90.0);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = needle_angle(0.0);
        for step in 1..=400 {
            let angle = needle_angle(step as f64 * 0.1);
            assert!(angle >= previous, "angle decreased at {}", step);
            assert!((-90.0..=90.0).contains(&angle));
            previous = angle;
        }
    }

    #[test]
    fn test_label() {
        let gauge = WindGauge::for_speed(4.12);
        assert_eq!(gauge.label, "4.1 m/s");
        assert!((gauge.angle - (-90.0 + 4.12 / 30.0 * 180.0)).abs() < 1e-9);
    }
}
