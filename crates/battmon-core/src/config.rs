//! Monitor configuration: the battery discharge curve, polling cadence and
//! debounce thresholds.
//!
//! Everything here is immutable once the monitor is constructed. Validation
//! happens exactly once, at construction; a bad table or cadence is a
//! [`ConfigError`] and the monitor never comes into existence.

use alloc::vec::Vec;
use thiserror_no_std::Error;

/// Number of raw ADC samples kept in the smoothing window.
pub const ADC_WINDOW_LEN: usize = 3;

/// One breakpoint of the battery discharge curve: a raw ADC magnitude and
/// the calibrated charge percentage it corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint {
    pub raw: u16,
    pub percent: u8,
}

impl CurvePoint {
    pub const fn new(raw: u16, percent: u8) -> Self {
        Self { raw, percent }
    }
}

/// Factory calibration for the stock battery, measured against the 12-bit
/// ADC at 11 dB attenuation.
const DEFAULT_CURVE: [CurvePoint; 6] = [
    CurvePoint::new(2030, 0),
    CurvePoint::new(2134, 20),
    CurvePoint::new(2252, 40),
    CurvePoint::new(2370, 60),
    CurvePoint::new(2488, 80),
    CurvePoint::new(2606, 100),
];

/// Piecewise-linear mapping from an averaged raw ADC value to a battery
/// percentage.
///
/// The table must hold at least two breakpoints and be strictly increasing
/// in both columns. [`BatteryCurve::new`] enforces this, so every curve in
/// circulation is well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryCurve {
    points: Vec<CurvePoint>,
}

impl BatteryCurve {
    /// Build a curve from calibration breakpoints, rejecting malformed
    /// tables.
    pub fn new(points: &[CurvePoint]) -> Result<Self, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::CurveTooShort(points.len()));
        }
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].raw <= pair[0].raw {
                return Err(ConfigError::RawNotIncreasing(i + 1));
            }
            if pair[1].percent <= pair[0].percent {
                return Err(ConfigError::PercentNotIncreasing(i + 1));
            }
        }
        Ok(Self {
            points: Vec::from(points),
        })
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }
}

impl Default for BatteryCurve {
    fn default() -> Self {
        // The factory table is known-good, no validation round trip.
        Self {
            points: Vec::from(DEFAULT_CURVE.as_slice()),
        }
    }
}

/// Fixed operating parameters of the monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Raw-ADC-to-percent calibration table.
    pub curve: BatteryCurve,
    /// Bias added to every raw sample before averaging, compensating a
    /// known offset of the voltage divider.
    pub adc_offset: i32,
    /// Battery resample cadence, in ticks, once the window is full.
    pub battery_interval_ticks: u32,
    /// Temperature resample cadence, in ticks.
    pub temperature_interval_ticks: u32,
    /// Level at or below which the low-battery signal asserts.
    pub low_battery_percent: u8,
    /// Minimum temperature delta, in degrees Celsius, before a change is
    /// reported.
    pub temperature_deadband: f32,
}

impl MonitorConfig {
    /// Check the cadence fields; the curve validates itself at build time.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.battery_interval_ticks == 0 || self.temperature_interval_ticks == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            curve: BatteryCurve::default(),
            adc_offset: 80,
            battery_interval_ticks: 60,
            temperature_interval_ticks: 10,
            low_battery_percent: 20,
            temperature_deadband: 3.5,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("battery curve needs at least two breakpoints, got {0}")]
    CurveTooShort(usize),
    #[error("battery curve raw values must be strictly increasing (index {0})")]
    RawNotIncreasing(usize),
    #[error("battery curve percentages must be strictly increasing (index {0})")]
    PercentNotIncreasing(usize),
    #[error("resample intervals must be at least one tick")]
    ZeroInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_curve_is_valid() {
        assert!(BatteryCurve::new(&DEFAULT_CURVE).is_ok());
    }

    #[test]
    fn rejects_short_tables() {
        assert_eq!(
            BatteryCurve::new(&[CurvePoint::new(2030, 0)]),
            Err(ConfigError::CurveTooShort(1))
        );
        assert_eq!(BatteryCurve::new(&[]), Err(ConfigError::CurveTooShort(0)));
    }

    #[test]
    fn rejects_non_increasing_raw_column() {
        let points = [
            CurvePoint::new(2030, 0),
            CurvePoint::new(2030, 50),
            CurvePoint::new(2606, 100),
        ];
        assert_eq!(
            BatteryCurve::new(&points),
            Err(ConfigError::RawNotIncreasing(1))
        );
    }

    #[test]
    fn rejects_non_increasing_percent_column() {
        let points = [
            CurvePoint::new(2030, 0),
            CurvePoint::new(2300, 60),
            CurvePoint::new(2606, 60),
        ];
        assert_eq!(
            BatteryCurve::new(&points),
            Err(ConfigError::PercentNotIncreasing(2))
        );
    }

    #[test]
    fn rejects_zero_intervals() {
        let config = MonitorConfig {
            battery_interval_ticks: 0,
            ..MonitorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }
}
