//! Weather dispatcher: the temperature bar
//!
//! The bar maps a fixed 32°F..100°F window onto the track. Readings outside
//! that window are legal and simply run off the ends of the bar.

use core::time::Duration;

use log::{debug, warn};

use crate::catalog::BarKind;
use crate::platform::{Timer, WeatherLink};
use crate::settings::{Settings, TemperatureScale};
use crate::state::BarTable;
use crate::storage::{self, KeyValueStore, StorageKey};

/// How often the companion is asked for a fresh reading.
pub const WEATHER_UPDATE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Temperature at the empty end of the bar.
pub const TEMPERATURE_FLOOR_F: i32 = 32;

/// Width of the displayed window, in °F.
pub const TEMPERATURE_SPAN_F: f32 = 68.0;

/// Whole degrees Celsius, truncated toward zero.
///
/// Computed in `i64`; the result always fits back into `i32`.
pub fn fahrenheit_to_celsius(fahrenheit: i32) -> i32 {
    ((i64::from(fahrenheit) - 32) * 5 / 9) as i32
}

/// Rewrite the temperature bar from a reading in °F.
pub fn update_temperature(table: &mut BarTable, settings: &Settings, fahrenheit: i32) {
    let progress = (fahrenheit as f32 - TEMPERATURE_FLOOR_F as f32) / TEMPERATURE_SPAN_F;
    let bar = &mut table[BarKind::Temperature];
    match settings.temperature_scale {
        TemperatureScale::Fahrenheit => {
            bar.set(progress, format_args!("{}\u{00B0}F", fahrenheit));
        }
        TemperatureScale::Celsius => {
            bar.set(
                progress,
                format_args!("{}\u{00B0}C", fahrenheit_to_celsius(fahrenheit)),
            );
        }
    }
}

/// Handle a reading from the companion.
///
/// The raw value is persisted even when the bar is hidden so that enabling
/// the bar later can show it immediately.
pub fn handle_temperature_received<S>(
    table: &mut BarTable,
    settings: &Settings,
    store: &mut S,
    fahrenheit: i32,
) -> bool
where
    S: KeyValueStore + ?Sized,
{
    debug!("Temperature received: {}F", fahrenheit);
    if settings.is_shown(BarKind::Temperature) {
        update_temperature(table, settings, fahrenheit);
    }
    if let Err(e) = storage::write_i32(store, StorageKey::Temperature, fahrenheit) {
        warn!("Failed to persist temperature: {}", e);
    }
    true
}

/// Handle the poll timer: request a reading if the bar is shown, then re-arm.
pub fn handle_poll_timer<P>(settings: &Settings, platform: &mut P)
where
    P: WeatherLink + Timer + ?Sized,
{
    if settings.is_shown(BarKind::Temperature) {
        match platform.request_temperature() {
            Ok(()) => debug!("Temperature requested"),
            Err(e) => warn!("Temperature request failed: {}", e),
        }
    }
    platform.schedule_weather_poll(WEATHER_UPDATE_INTERVAL);
}
