//! The battery monitor: per-tick orchestration, debounced published state
//! and callback dispatch.
//!
//! One `BatteryMonitor` owns the three hardware capabilities and all
//! derived state for its whole lifetime. The host scheduler calls
//! [`BatteryMonitor::tick`] once per fixed period (nominally one second);
//! ticks must be serialized, never overlapped. Everything else — the
//! accessors and [`BatteryMonitor::status`] — is a plain snapshot read of
//! the last published values and never touches hardware.

use alloc::boxed::Box;
use heapless::Deque;
use log::{info, warn};

use crate::config::{ADC_WINDOW_LEN, ConfigError, MonitorConfig};
use crate::debounce;
use crate::estimate;
use crate::sample::{BatteryAdc, ChargeDetect, SampleError, TemperatureSense};

/// Snapshot of the published monitor state, cheap to copy across tasks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerStatus {
    pub battery_level: u8,
    pub is_charging: bool,
    pub is_low_battery: bool,
    pub temperature: f32,
}

type BoolHandler = Box<dyn FnMut(bool)>;
type TemperatureHandler = Box<dyn FnMut(f32)>;

/// Periodic power monitor over injected charge-pin, battery-ADC and
/// temperature capabilities.
pub struct BatteryMonitor<C, A, T> {
    charge: C,
    adc: A,
    temperature: T,
    config: MonitorConfig,

    adc_window: Deque<u16, ADC_WINDOW_LEN>,
    battery_level: u8,
    charge_pin_active: bool,
    is_low_battery: bool,
    last_temperature: f32,
    tick_count: u32,

    charging_handler: Option<BoolHandler>,
    low_battery_handler: Option<BoolHandler>,
    temperature_handler: Option<TemperatureHandler>,
}

impl<C, A, T> BatteryMonitor<C, A, T>
where
    C: ChargeDetect,
    A: BatteryAdc,
    T: TemperatureSense,
{
    /// Take ownership of the three capabilities and validate the
    /// configuration.
    ///
    /// The capabilities are held until the monitor is dropped, which
    /// releases them exactly once. An invalid configuration fails
    /// construction outright; the monitor never exists half-initialized.
    pub fn new(
        config: MonitorConfig,
        charge: C,
        adc: A,
        temperature: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            charge,
            adc,
            temperature,
            config,
            adc_window: Deque::new(),
            battery_level: 0,
            charge_pin_active: false,
            is_low_battery: false,
            last_temperature: 0.0,
            tick_count: 0,
            charging_handler: None,
            low_battery_handler: None,
            temperature_handler: None,
        })
    }

    /// Run one poll cycle.
    ///
    /// A failed hardware read logs a warning and abandons the rest of the
    /// cycle; published values keep their last-known-good state and the
    /// next tick retries naturally.
    ///
    /// A charge-pin flip dispatches immediately, forces one battery
    /// resample and ends the cycle early — charging-state freshness is
    /// deliberately prioritized over cadence regularity, so a pin that
    /// toggles every tick will delay the battery and temperature cadences.
    pub fn tick(&mut self) {
        if let Err(e) = self.poll() {
            warn!("poll cycle abandoned: {}", e);
        }
    }

    fn poll(&mut self) -> Result<(), SampleError> {
        let pin_active = self.charge.is_charger_present()?;
        if let Some(now_charging) = debounce::bool_edge(self.charge_pin_active, pin_active) {
            self.charge_pin_active = now_charging;
            if let Some(handler) = self.charging_handler.as_mut() {
                handler(now_charging);
            }
            // The charge transition invalidates the smoothed level, so
            // refresh it right away and skip the rest of this cycle.
            return self.resample_battery();
        }

        if !self.adc_window.is_full() {
            // Warm-up: fill the window on every tick.
            return self.resample_battery();
        }

        self.tick_count = self.tick_count.wrapping_add(1);
        if self.tick_count % self.config.battery_interval_ticks == 0 {
            self.resample_battery()?;
        }
        if self.tick_count % self.config.temperature_interval_ticks == 0 {
            self.resample_temperature()?;
        }
        Ok(())
    }

    fn resample_battery(&mut self) -> Result<(), SampleError> {
        let raw = self.adc.read_raw()?;
        if self.adc_window.is_full() {
            self.adc_window.pop_front();
        }
        // Capacity was just freed, the push cannot fail.
        let _ = self.adc_window.push_back(raw);

        let mean = estimate::offset_mean(self.adc_window.iter(), self.config.adc_offset)
            .unwrap_or_default();
        self.battery_level = self.config.curve.estimate(mean);
        info!(
            "battery adc raw {} mean {} level {}%",
            raw, mean, self.battery_level
        );

        // The low-battery signal only reacts to a fully smoothed average,
        // never to a partial warm-up window.
        if self.adc_window.is_full() {
            let low = self.battery_level <= self.config.low_battery_percent;
            if let Some(now_low) = debounce::bool_edge(self.is_low_battery, low) {
                self.is_low_battery = now_low;
                if let Some(handler) = self.low_battery_handler.as_mut() {
                    handler(now_low);
                }
            }
        }
        Ok(())
    }

    fn resample_temperature(&mut self) -> Result<(), SampleError> {
        let celsius = self.temperature.read_celsius()?;
        if let Some(reported) = debounce::deadband_edge(
            self.last_temperature,
            celsius,
            self.config.temperature_deadband,
        ) {
            self.last_temperature = reported;
            info!("temperature now {:.1} C", reported);
            if let Some(handler) = self.temperature_handler.as_mut() {
                handler(reported);
            }
        }
        Ok(())
    }

    /// Smoothed battery percentage. Stays at 0 until the first sample
    /// lands during warm-up.
    pub fn battery_level(&self) -> u8 {
        self.battery_level
    }

    /// Whether the charger is attached. A full battery never reports as
    /// charging, even while the pin is active.
    pub fn is_charging(&self) -> bool {
        if self.battery_level == 100 {
            return false;
        }
        self.charge_pin_active
    }

    /// The pin cannot distinguish idle from discharging, so this is the
    /// plain negation of charger presence.
    pub fn is_discharging(&self) -> bool {
        !self.charge_pin_active
    }

    /// True while the smoothed level sits at or below the low-battery
    /// threshold.
    pub fn is_low_battery(&self) -> bool {
        self.is_low_battery
    }

    /// Last reported temperature in degrees Celsius; 0.0 until the first
    /// report.
    pub fn temperature(&self) -> f32 {
        self.last_temperature
    }

    /// Copyable snapshot of everything published, for handing across
    /// tasks.
    pub fn status(&self) -> PowerStatus {
        PowerStatus {
            battery_level: self.battery_level,
            is_charging: self.is_charging(),
            is_low_battery: self.is_low_battery,
            temperature: self.last_temperature,
        }
    }

    /// Register the charging transition handler, replacing any previous
    /// one.
    ///
    /// Handlers run synchronously inside [`BatteryMonitor::tick`] and must
    /// not block or call back into the monitor.
    pub fn on_charging_changed(&mut self, handler: impl FnMut(bool) + 'static) {
        self.charging_handler = Some(Box::new(handler));
    }

    /// Register the low-battery transition handler, replacing any previous
    /// one.
    pub fn on_low_battery_changed(&mut self, handler: impl FnMut(bool) + 'static) {
        self.low_battery_handler = Some(Box::new(handler));
    }

    /// Register the temperature change handler, replacing any previous
    /// one.
    pub fn on_temperature_changed(&mut self, handler: impl FnMut(f32) + 'static) {
        self.temperature_handler = Some(Box::new(handler));
    }
}
