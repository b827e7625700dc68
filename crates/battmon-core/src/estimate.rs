//! Battery level estimation: window averaging plus piecewise-linear curve
//! lookup.
//!
//! The estimator is pure. It runs on whatever samples are present, so a
//! warm-up window that is not yet full still produces an early, less
//! smoothed estimate rather than no estimate at all.

use crate::config::BatteryCurve;

/// Mean of the window after applying the fixed sensor bias offset, using
/// integer arithmetic like the ADC itself. `None` for an empty window.
pub fn offset_mean<'a, I>(samples: I, offset: i32) -> Option<u32>
where
    I: IntoIterator<Item = &'a u16>,
{
    let mut sum: i64 = 0;
    let mut count: i64 = 0;
    for &sample in samples {
        sum += i64::from(sample) + i64::from(offset);
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some((sum / count).max(0) as u32)
    }
}

impl BatteryCurve {
    /// Map an offset-adjusted mean onto the curve.
    ///
    /// Values below the first breakpoint clamp to 0, values at or above the
    /// last clamp to 100; in between, the bracketing pair is linearly
    /// interpolated and truncated to an integer percentage.
    pub fn estimate(&self, mean: u32) -> u8 {
        let points = self.points();
        let first = points[0];
        let last = points[points.len() - 1];

        if mean < u32::from(first.raw) {
            return 0;
        }
        if mean >= u32::from(last.raw) {
            return 100;
        }

        for pair in points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if mean >= u32::from(lo.raw) && mean < u32::from(hi.raw) {
                let ratio = (mean - u32::from(lo.raw)) as f32 / f32::from(hi.raw - lo.raw);
                return lo.percent + (ratio * f32::from(hi.percent - lo.percent)) as u8;
            }
        }

        // Unreachable with a validated (strictly increasing) table.
        last.percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurvePoint;
    use alloc::vec::Vec;

    fn curve() -> BatteryCurve {
        BatteryCurve::default()
    }

    #[test]
    fn mean_applies_offset() {
        let samples = [2060u16, 2060, 2060];
        assert_eq!(offset_mean(samples.iter(), 80), Some(2140));
    }

    #[test]
    fn mean_of_empty_window_is_none() {
        let samples: [u16; 0] = [];
        assert_eq!(offset_mean(samples.iter(), 80), None);
    }

    #[test]
    fn mean_never_goes_negative() {
        let samples = [10u16];
        assert_eq!(offset_mean(samples.iter(), -100), Some(0));
    }

    #[test]
    fn partial_windows_stay_in_range() {
        let curve = curve();
        for len in 1..=3usize {
            for raw in [0u16, 1900, 2100, 2300, 2500, 2700, 4095] {
                let samples: Vec<u16> = (0..len).map(|_| raw).collect();
                let mean = offset_mean(samples.iter(), 80).unwrap();
                let level = curve.estimate(mean);
                assert!(level <= 100, "raw {raw} len {len} gave {level}");
            }
        }
    }

    #[test]
    fn estimate_is_monotonic() {
        let curve = curve();
        let mut previous = 0;
        for mean in 2030..=2606u32 {
            let level = curve.estimate(mean);
            assert!(level >= previous, "level dropped at mean {mean}");
            previous = level;
        }
    }

    #[test]
    fn clamps_below_first_breakpoint() {
        let curve = curve();
        assert_eq!(curve.estimate(0), 0);
        assert_eq!(curve.estimate(2029), 0);
        assert_eq!(curve.estimate(2030), 0);
    }

    #[test]
    fn clamps_at_and_above_last_breakpoint() {
        let curve = curve();
        assert_eq!(curve.estimate(2606), 100);
        assert_eq!(curve.estimate(4095), 100);
    }

    #[test]
    fn interpolates_between_breakpoints() {
        let curve = curve();
        // Between (2134, 20) and (2252, 40): 20 + 6/118 * 20 = 21.01 -> 21.
        assert_eq!(curve.estimate(2140), 21);
        // Exactly on an interior breakpoint.
        assert_eq!(curve.estimate(2252), 40);
        // Midway between (2370, 60) and (2488, 80).
        assert_eq!(curve.estimate(2429), 70);
    }

    #[test]
    fn synthetic_identity_curve() {
        let curve = BatteryCurve::new(&[CurvePoint::new(0, 0), CurvePoint::new(100, 100)])
            .expect("valid curve");
        assert_eq!(curve.estimate(25), 25);
        assert_eq!(curve.estimate(99), 99);
        assert_eq!(curve.estimate(100), 100);
    }
}
