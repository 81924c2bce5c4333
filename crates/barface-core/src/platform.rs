//! Host services the engine depends on
//!
//! Every capability the display needs from its host is a small trait here:
//! wall-clock time, battery and activity monitors, the companion link, a
//! one-shot timer, the backlight and persistent storage. The firmware and the
//! simulator each provide one [`Platform`] that implements all of them.
//!
//! Subscriptions are fire-and-forget: after subscribing, the host delivers
//! the corresponding [`Event`](crate::events::Event)s through the event queue.

use core::time::Duration;

use crate::error::LinkError;
use crate::storage::KeyValueStore;
use crate::time::{LocalTime, TimeUnit};

/// Battery charge snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryChargeState {
    /// 0..=100
    pub charge_percent: u8,
    pub is_charging: bool,
    pub is_plugged: bool,
}

/// Kinds of activity notifications the health service emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthEvent {
    /// Aggregated health data changed substantially, e.g. after a day rollover.
    SignificantUpdate,
    /// New movement data (steps) is available.
    MovementUpdate,
    SleepUpdate,
    MetricAlert,
    HeartRateUpdate,
}

pub trait Clock {
    /// Current local time.
    fn now(&self) -> LocalTime;

    /// Whether the user prefers a 24-hour clock.
    fn is_24h_style(&self) -> bool;

    /// Deliver a tick each time `unit` (or any coarser unit) changes.
    ///
    /// Replaces any previous tick subscription.
    fn subscribe_ticks(&mut self, unit: TimeUnit);
}

pub trait BatteryMonitor {
    fn peek_battery(&self) -> BatteryChargeState;
    fn subscribe_battery(&mut self);
    fn unsubscribe_battery(&mut self);
}

pub trait ActivityMonitor {
    /// Steps taken since midnight, or `None` if step data is unavailable.
    fn steps_today(&self) -> Option<u32>;
    fn subscribe_health(&mut self);
    fn unsubscribe_health(&mut self);
}

/// Outbound side of the companion link.
pub trait WeatherLink {
    /// Ask the companion for a fresh temperature reading.
    ///
    /// The reply, if any, arrives later as a message.
    fn request_temperature(&mut self) -> Result<(), LinkError>;
}

pub trait Timer {
    /// Arm the one-shot weather poll timer to fire after `after`.
    fn schedule_weather_poll(&mut self, after: Duration);
}

pub trait Backlight {
    /// Briefly light the screen.
    fn pulse(&mut self);
}

/// Everything the engine needs from its host.
pub trait Platform:
    Clock + BatteryMonitor + ActivityMonitor + WeatherLink + Timer + Backlight + KeyValueStore
{
}

impl<T> Platform for T where
    T: Clock + BatteryMonitor + ActivityMonitor + WeatherLink + Timer + Backlight + KeyValueStore
{
}
