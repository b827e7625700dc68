#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use embassy_executor::Spawner;
use embassy_time::{Duration, Ticker};
use esp_hal::analog::adc::{Adc, AdcConfig, Attenuation};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::timer::timg::TimerGroup;
use esp_hal::tsens::{self, TemperatureSensor};
use log::info;

use battmon_core::{BatteryMonitor, ChargePin, MonitorConfig};
use battmon_firmware::power::{DieTemperature, VbatAdc};

extern crate alloc;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 32768);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    // Charge detect from the charger IC: plain input, high while the
    // charger is attached, no pulls (the board has its own divider).
    let charge_pin = Input::new(
        peripherals.GPIO2,
        InputConfig::default().with_pull(Pull::None),
    );

    // Battery voltage divider on ADC1 channel 9 (GPIO10), 12 dB
    // attenuation to cover the full divider range.
    let mut adc_config = AdcConfig::new();
    let vbat_pin = adc_config.enable_pin(peripherals.GPIO10, Attenuation::_11dB);
    let adc = Adc::new(peripherals.ADC1, adc_config);

    let temperature_sensor = TemperatureSensor::new(peripherals.TSENS, tsens::Config::default())
        .expect("temperature sensor configuration is valid");

    let mut monitor = BatteryMonitor::new(
        MonitorConfig::default(),
        ChargePin(charge_pin),
        VbatAdc::new(adc, vbat_pin),
        DieTemperature::new(temperature_sensor),
    )
    .expect("factory configuration is valid");

    monitor.on_charging_changed(|charging| {
        info!("charger {}", if charging { "attached" } else { "removed" });
    });
    monitor.on_low_battery_changed(|low| {
        info!("low battery {}", if low { "asserted" } else { "cleared" });
    });
    monitor.on_temperature_changed(|celsius| {
        info!("temperature changed to {:.1} C", celsius);
    });

    let _ = spawner;

    // One poll per second. Ticker skips missed deadlines instead of
    // overlapping them, so a slow cycle never races the next one.
    let mut ticker = Ticker::every(Duration::from_secs(1));
    loop {
        ticker.next().await;
        monitor.tick();
    }
}
