//! Hardware-independent battery and power monitoring core for battmon-rs
//!
//! This crate contains all platform-agnostic logic for the power subsystem
//! of a battery-powered device: the debounced battery/charging/temperature
//! state machine, the piecewise-linear level estimator, the capability
//! traits the host hardware must implement, and their configuration.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets (ESP32-S3) and desktop hosts (for the simulator and
//! tests).

#![no_std]

extern crate alloc;

pub mod config;
pub mod debounce;
pub mod estimate;
pub mod monitor;
pub mod sample;

pub use config::{BatteryCurve, ConfigError, CurvePoint, MonitorConfig};
pub use monitor::{BatteryMonitor, PowerStatus};
pub use sample::{BatteryAdc, ChargeDetect, ChargePin, SampleError, TemperatureSense};
