//! ESP32-S3 specific modules for battmon-rs
//!
//! This crate contains hardware-specific code that cannot compile on
//! desktop targets: the esp-hal implementations of the battmon-core
//! capability traits (oneshot ADC, internal temperature sensor) and the
//! peripheral wiring for the battery monitor task.

#![no_std]

extern crate alloc;

pub mod power;
