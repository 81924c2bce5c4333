//! Recording [`Platform`](crate::platform::Platform) double for unit tests.

use core::time::Duration;

use crate::error::{LinkError, StoreError};
use crate::platform::{
    ActivityMonitor, Backlight, BatteryChargeState, BatteryMonitor, Clock, Timer, WeatherLink,
};
use crate::storage::{KeyValueStore, MemoryStore, StorageKey};
use crate::time::{LocalTime, TimeUnit};

/// Thursday 2024-02-29, 13:05:07.
pub const LEAP_DAY_AFTERNOON: LocalTime = LocalTime {
    second: 7,
    minute: 5,
    hour: 13,
    weekday: 4,
    day_of_month: 29,
    month: 1,
    year: 2024,
    day_of_year: 59,
};

pub struct MockPlatform {
    pub now: LocalTime,
    pub clock_24h: bool,
    pub battery: BatteryChargeState,
    pub steps: Option<u32>,
    pub link_error: Option<LinkError>,

    pub tick_unit: Option<TimeUnit>,
    pub battery_subscribed: bool,
    pub health_subscribed: bool,
    pub temperature_requests: usize,
    pub scheduled_polls: Vec<Duration>,
    pub backlight_pulses: usize,
    pub store: MemoryStore,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            now: LEAP_DAY_AFTERNOON,
            clock_24h: true,
            battery: BatteryChargeState {
                charge_percent: 70,
                is_charging: false,
                is_plugged: false,
            },
            steps: Some(0),
            link_error: None,
            tick_unit: None,
            battery_subscribed: false,
            health_subscribed: false,
            temperature_requests: 0,
            scheduled_polls: Vec::new(),
            backlight_pulses: 0,
            store: MemoryStore::new(),
        }
    }
}

impl Clock for MockPlatform {
    fn now(&self) -> LocalTime {
        self.now
    }

    fn is_24h_style(&self) -> bool {
        self.clock_24h
    }

    fn subscribe_ticks(&mut self, unit: TimeUnit) {
        self.tick_unit = Some(unit);
    }
}

impl BatteryMonitor for MockPlatform {
    fn peek_battery(&self) -> BatteryChargeState {
        self.battery
    }

    fn subscribe_battery(&mut self) {
        self.battery_subscribed = true;
    }

    fn unsubscribe_battery(&mut self) {
        self.battery_subscribed = false;
    }
}

impl ActivityMonitor for MockPlatform {
    fn steps_today(&self) -> Option<u32> {
        self.steps
    }

    fn subscribe_health(&mut self) {
        self.health_subscribed = true;
    }

    fn unsubscribe_health(&mut self) {
        self.health_subscribed = false;
    }
}

impl WeatherLink for MockPlatform {
    fn request_temperature(&mut self) -> Result<(), LinkError> {
        self.temperature_requests += 1;
        match self.link_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Timer for MockPlatform {
    fn schedule_weather_poll(&mut self, after: Duration) {
        self.scheduled_polls.push(after);
    }
}

impl Backlight for MockPlatform {
    fn pulse(&mut self) {
        self.backlight_pulses += 1;
    }
}

impl KeyValueStore for MockPlatform {
    fn read(&self, key: StorageKey, buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        self.store.read(key, buf)
    }

    fn write(&mut self, key: StorageKey, value: &[u8]) -> Result<(), StoreError> {
        self.store.write(key, value)
    }

    fn delete(&mut self, key: StorageKey) -> Result<(), StoreError> {
        self.store.delete(key)
    }

    fn exists(&self, key: StorageKey) -> bool {
        self.store.exists(key)
    }
}
