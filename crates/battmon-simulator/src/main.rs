//! Desktop simulator for the battmon-rs power monitor.
//!
//! Drives `battmon-core` with scripted synthetic sensors so the monitor can
//! be exercised without hardware: the battery discharges with ADC noise,
//! the charger is plugged in partway through and topped off, and the die
//! temperature drifts. One loop iteration is one scheduler tick, with time
//! compressed so a full session takes a few seconds of wall clock.

use std::cell::Cell;
use std::rc::Rc;
use std::thread::sleep;
use std::time::Duration;

use log::info;

use battmon_core::{
    BatteryAdc, BatteryMonitor, ChargeDetect, MonitorConfig, SampleError, TemperatureSense,
};

/// Total scripted session length, in ticks.
const SESSION_TICKS: u32 = 600;

/// Compressed tick period. The real firmware ticks once per second.
const TICK_PERIOD: Duration = Duration::from_millis(10);

/// Tick at which the charger is plugged in, and later removed.
const CHARGER_PLUG_TICK: u32 = 240;
const CHARGER_UNPLUG_TICK: u32 = 520;

/// Shared scripted world state the sensor stubs read from.
struct World {
    tick: Cell<u32>,
    /// Tiny deterministic PRNG for ADC noise (xorshift32).
    noise: Cell<u32>,
}

impl World {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            tick: Cell::new(0),
            noise: Cell::new(0x1234_5678),
        })
    }

    fn next_noise(&self) -> i32 {
        let mut x = self.noise.get();
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.noise.set(x);
        // Spread over roughly +/- 6 counts of jitter.
        (x % 13) as i32 - 6
    }

    fn charger_attached(&self) -> bool {
        let t = self.tick.get();
        (CHARGER_PLUG_TICK..CHARGER_UNPLUG_TICK).contains(&t)
    }

    /// Battery voltage in raw ADC counts: discharges until the charger is
    /// attached, then recovers toward full.
    fn battery_raw(&self) -> u16 {
        let t = self.tick.get();
        let base: i32 = if t < CHARGER_PLUG_TICK {
            // ~2520 down to ~2050 over the discharge leg.
            2520 - (t as i32 * 2)
        } else if t < CHARGER_UNPLUG_TICK {
            let charging_for = (t - CHARGER_PLUG_TICK) as i32;
            (2040 + charging_for * 3).min(2560)
        } else {
            2560
        };
        (base + self.next_noise()).clamp(0, 4095) as u16
    }

    /// Die temperature: ambient, with a slow rise while charging.
    fn temperature(&self) -> f32 {
        let t = self.tick.get();
        let mut celsius = 24.0 + (t as f32 / 100.0).sin() * 1.5;
        if self.charger_attached() {
            celsius += ((t - CHARGER_PLUG_TICK) as f32 * 0.05).min(8.0);
        }
        celsius
    }
}

struct SimChargePin(Rc<World>);

impl ChargeDetect for SimChargePin {
    fn is_charger_present(&mut self) -> Result<bool, SampleError> {
        Ok(self.0.charger_attached())
    }
}

struct SimBatteryAdc(Rc<World>);

impl BatteryAdc for SimBatteryAdc {
    fn read_raw(&mut self) -> Result<u16, SampleError> {
        Ok(self.0.battery_raw())
    }
}

struct SimTemperature(Rc<World>);

impl TemperatureSense for SimTemperature {
    fn read_celsius(&mut self) -> Result<f32, SampleError> {
        Ok(self.0.temperature())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let world = World::new();

    // Shorter cadences than the firmware defaults so the compressed
    // session still shows plenty of resamples.
    let config = MonitorConfig {
        battery_interval_ticks: 20,
        temperature_interval_ticks: 5,
        ..MonitorConfig::default()
    };

    let mut monitor = BatteryMonitor::new(
        config,
        SimChargePin(world.clone()),
        SimBatteryAdc(world.clone()),
        SimTemperature(world.clone()),
    )
    .expect("default configuration is valid");

    monitor.on_charging_changed(|charging| {
        info!(
            "charger {}",
            if charging { "attached" } else { "removed" }
        );
    });
    monitor.on_low_battery_changed(|low| {
        if low {
            info!("low battery asserted");
        } else {
            info!("low battery cleared");
        }
    });
    monitor.on_temperature_changed(|celsius| {
        info!("temperature changed to {celsius:.1} C");
    });

    for tick in 0..SESSION_TICKS {
        world.tick.set(tick);
        monitor.tick();
        sleep(TICK_PERIOD);
    }

    let status = monitor.status();
    info!(
        "session done: level {}% charging {} low {} temperature {:.1} C",
        status.battery_level, status.is_charging, status.is_low_battery, status.temperature
    );
}
