//! Transition decisions for the derived signals.
//!
//! Each decision compares a candidate value against the last reported one
//! and answers whether the change is worth dispatching. A positive decision
//! carries the value to report; a negative one suppresses dispatch and
//! leaves stored state alone.

/// Boolean edge rule: any flip is a transition.
///
/// Used for the charging signal (the pin is already debounced at the
/// driver level) and for the low-battery signal (which is gated on a full
/// sample window by the caller, so the smoothed average cannot flap on a
/// single noisy sample).
pub fn bool_edge(reported: bool, candidate: bool) -> Option<bool> {
    if candidate != reported {
        Some(candidate)
    } else {
        None
    }
}

/// Magnitude deadband rule: fires only once the candidate has moved at
/// least `deadband` away from the last reported value, in either direction.
///
/// Direction-insensitive on purpose; jitter around a boundary never causes
/// a notification storm because the reported value only moves on a fire.
pub fn deadband_edge(reported: f32, candidate: f32, deadband: f32) -> Option<f32> {
    if (candidate - reported).abs() >= deadband {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_edge_fires_on_any_flip() {
        assert_eq!(bool_edge(false, true), Some(true));
        assert_eq!(bool_edge(true, false), Some(false));
        assert_eq!(bool_edge(true, true), None);
        assert_eq!(bool_edge(false, false), None);
    }

    #[test]
    fn deadband_holds_until_threshold() {
        assert_eq!(deadband_edge(25.0, 28.4, 3.5), None);
        assert_eq!(deadband_edge(25.0, 28.6, 3.5), Some(28.6));
        // Exactly at the deadband fires.
        assert_eq!(deadband_edge(25.0, 28.5, 3.5), Some(28.5));
    }

    #[test]
    fn deadband_is_direction_insensitive() {
        assert_eq!(deadband_edge(25.0, 21.4, 3.5), Some(21.4));
        assert_eq!(deadband_edge(25.0, 22.0, 3.5), None);
    }
}
