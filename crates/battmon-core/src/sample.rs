//! Injected hardware capabilities: one blocking read per physical input.
//!
//! The monitor never touches peripherals directly; the host hands it one
//! implementation of each trait at construction and they are released when
//! the monitor is dropped. No smoothing or interpretation happens at this
//! layer — a read either yields the raw value or fails for this tick.

use thiserror_no_std::Error;

/// A capability read that could not complete (device busy, bus error).
///
/// Transient by contract: the tick that observed it is abandoned and the
/// next scheduled tick retries.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    #[error("{sensor} read failed while trying to {operation}: {details}")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: &'static str,
    },
}

/// Charge-detect input: a digital line that is high while the charger is
/// attached. Expected to be debounced by the hardware or driver.
pub trait ChargeDetect {
    fn is_charger_present(&mut self) -> Result<bool, SampleError>;
}

/// Battery voltage input: a single raw oneshot ADC conversion.
pub trait BatteryAdc {
    fn read_raw(&mut self) -> Result<u16, SampleError>;
}

/// Die temperature input, in degrees Celsius.
pub trait TemperatureSense {
    fn read_celsius(&mut self) -> Result<f32, SampleError>;
}

/// Adapter turning any `embedded-hal` digital input into a [`ChargeDetect`]
/// capability.
pub struct ChargePin<P>(pub P);

impl<P: embedded_hal::digital::InputPin> ChargeDetect for ChargePin<P> {
    fn is_charger_present(&mut self) -> Result<bool, SampleError> {
        self.0.is_high().map_err(|_| SampleError::ReadFailed {
            sensor: "charge pin",
            operation: "read the input level",
            details: "digital input read failed",
        })
    }
}
