//! esp-hal implementations of the battmon-core capability traits.
//!
//! The charge-detect pin needs no adapter of its own: esp-hal's `Input`
//! implements the `embedded-hal` `InputPin` trait, so it slots into
//! `battmon_core::ChargePin` directly.

use battmon_core::{BatteryAdc, SampleError, TemperatureSense};
use esp_hal::Blocking;
use esp_hal::analog::adc::{Adc, AdcChannel, AdcPin};
use esp_hal::peripherals::ADC1;
use esp_hal::tsens::TemperatureSensor;

/// Battery voltage divider on an ADC1 channel, read as a raw oneshot
/// conversion. The ADC unit is owned here for the monitor's whole lifetime
/// and released when the monitor is dropped.
pub struct VbatAdc<'d, P> {
    adc: Adc<'d, ADC1<'d>, Blocking>,
    pin: AdcPin<P, ADC1<'d>>,
}

impl<'d, P> VbatAdc<'d, P> {
    pub fn new(adc: Adc<'d, ADC1<'d>, Blocking>, pin: AdcPin<P, ADC1<'d>>) -> Self {
        Self { adc, pin }
    }
}

impl<'d, P: AdcChannel> BatteryAdc for VbatAdc<'d, P> {
    fn read_raw(&mut self) -> Result<u16, SampleError> {
        Ok(self.adc.read_blocking(&mut self.pin))
    }
}

/// The on-die temperature sensor. Enabled at construction, disabled when
/// dropped.
pub struct DieTemperature<'d> {
    sensor: TemperatureSensor<'d>,
}

impl<'d> DieTemperature<'d> {
    pub fn new(sensor: TemperatureSensor<'d>) -> Self {
        Self { sensor }
    }
}

impl TemperatureSense for DieTemperature<'_> {
    fn read_celsius(&mut self) -> Result<f32, SampleError> {
        Ok(self.sensor.get_temperature().to_celsius())
    }
}
