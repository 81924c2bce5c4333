//! Synthetic host services for the simulator.
//!
//! Time comes from the host's local clock. Battery, step and weather data
//! are generated so every bar moves without hardware or a companion app.

use std::time::{Duration, Instant};

use barface_core::error::{LinkError, StoreError};
use barface_core::events::{self, Event, EventQueue};
use barface_core::message::{Message, MessageKey, MessageValue};
use barface_core::platform::{
    ActivityMonitor, Backlight, BatteryChargeState, BatteryMonitor, Clock, HealthEvent, Timer,
    WeatherLink,
};
use barface_core::storage::{KeyValueStore, StorageKey};
use barface_core::time::{self, LocalTime, TimeUnit};
use chrono::{Datelike, Local, Timelike};
use log::{debug, info};

use crate::store::FileStore;

/// Battery drain step and period.
const BATTERY_STEP_PERCENT: u8 = 10;
const BATTERY_INTERVAL: Duration = Duration::from_secs(20);

/// Synthetic walking pace.
const STEPS_PER_UPDATE: u32 = 137;
const STEPS_INTERVAL: Duration = Duration::from_secs(3);

/// Delay before the fake companion answers a temperature request.
const WEATHER_REPLY_DELAY: Duration = Duration::from_millis(750);

fn local_time() -> LocalTime {
    let now = Local::now();
    LocalTime {
        second: now.second() as u8,
        minute: now.minute() as u8,
        hour: now.hour() as u8,
        weekday: now.weekday().num_days_from_sunday() as u8,
        day_of_month: now.day() as u8,
        month: now.month0() as u8,
        year: now.year(),
        day_of_year: now.ordinal0() as u16,
    }
}

pub struct SimPlatform {
    pub clock_24h: bool,
    tick_unit: Option<TimeUnit>,
    last_time: LocalTime,

    battery: BatteryChargeState,
    battery_subscribed: bool,
    next_battery_change: Instant,

    steps: u32,
    health_subscribed: bool,
    next_steps_update: Instant,

    weather_poll_at: Option<Instant>,
    weather_reply_at: Option<Instant>,
    temperature_requests: u32,

    store: FileStore,
}

impl SimPlatform {
    pub fn new(store: FileStore) -> Self {
        let now = Instant::now();
        Self {
            clock_24h: true,
            tick_unit: None,
            last_time: local_time(),
            battery: BatteryChargeState {
                charge_percent: 100,
                is_charging: false,
                is_plugged: false,
            },
            battery_subscribed: false,
            next_battery_change: now + BATTERY_INTERVAL,
            steps: 4_200,
            health_subscribed: false,
            next_steps_update: now + STEPS_INTERVAL,
            weather_poll_at: None,
            weather_reply_at: None,
            temperature_requests: 0,
            store,
        }
    }

    /// Fire the weather poll timer now instead of waiting for it.
    pub fn expire_weather_timer(&mut self) {
        self.weather_poll_at = Some(Instant::now());
    }

    /// Generate every event that is due and post it to `queue`.
    pub fn poll(&mut self, queue: &EventQueue) {
        let now = Instant::now();

        let time = local_time();
        let changed = time::changed_units(&self.last_time, &time);
        self.last_time = time;
        if let Some(unit) = self.tick_unit
            && !changed.is_disjoint(unit.and_coarser())
        {
            events::post(queue, Event::Tick { time, changed });
        }

        if now >= self.next_battery_change {
            self.next_battery_change = now + BATTERY_INTERVAL;
            self.battery.charge_percent = match self.battery.charge_percent {
                0 => 100,
                percent => percent.saturating_sub(BATTERY_STEP_PERCENT),
            };
            if self.battery_subscribed {
                events::post(queue, Event::Battery(self.battery));
            }
        }

        if now >= self.next_steps_update {
            self.next_steps_update = now + STEPS_INTERVAL;
            self.steps += STEPS_PER_UPDATE;
            if self.health_subscribed {
                events::post(queue, Event::Health(HealthEvent::MovementUpdate));
            }
        }

        if self.weather_poll_at.is_some_and(|at| now >= at) {
            self.weather_poll_at = None;
            events::post(queue, Event::WeatherTimer);
        }

        if self.weather_reply_at.is_some_and(|at| now >= at) {
            self.weather_reply_at = None;
            events::post(queue, Event::Message(self.temperature_reply()));
        }
    }

    /// A reading that sweeps through and past the displayed window.
    fn temperature_reply(&self) -> Message {
        let fahrenheit = 20 + (self.temperature_requests as i32 * 11) % 100;
        info!("Companion replies with {}F", fahrenheit);
        let mut message = Message::new();
        // A one-tuple message always fits.
        let _ = message.push((MessageKey::Temperature, MessageValue::Int(fahrenheit)));
        message
    }
}

impl Clock for SimPlatform {
    fn now(&self) -> LocalTime {
        local_time()
    }

    fn is_24h_style(&self) -> bool {
        self.clock_24h
    }

    fn subscribe_ticks(&mut self, unit: TimeUnit) {
        debug!("Ticking every {:?}", unit);
        self.tick_unit = Some(unit);
    }
}

impl BatteryMonitor for SimPlatform {
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

impl ActivityMonitor for SimPlatform {
    fn steps_today(&self) -> Option<u32> {
        Some(self.steps)
    }

    fn subscribe_health(&mut self) {
        self.health_subscribed = true;
    }

    fn unsubscribe_health(&mut self) {
        self.health_subscribed = false;
    }
}

impl WeatherLink for SimPlatform {
    fn request_temperature(&mut self) -> Result<(), LinkError> {
        if self.weather_reply_at.is_some() {
            return Err(LinkError::Busy);
        }
        self.temperature_requests += 1;
        self.weather_reply_at = Some(Instant::now() + WEATHER_REPLY_DELAY);
        Ok(())
    }
}

impl Timer for SimPlatform {
    fn schedule_weather_poll(&mut self, after: Duration) {
        debug!("Next weather poll in {:?}", after);
        self.weather_poll_at = Some(Instant::now() + after);
    }
}

impl Backlight for SimPlatform {
    fn pulse(&mut self) {
        info!("Backlight pulse");
    }
}

impl KeyValueStore for SimPlatform {
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
