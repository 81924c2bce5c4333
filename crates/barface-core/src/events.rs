//! Events delivered to the display engine
//!
//! Every external source (clock, battery, activity service, companion link,
//! weather timer) posts into one [`EventQueue`]. The engine drains it in
//! order from a single loop, so handlers never run concurrently.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use enumset::EnumSet;
use log::warn;

use crate::message::Message;
use crate::platform::{BatteryChargeState, HealthEvent};
use crate::time::{LocalTime, TimeUnit};

/// Number of events that can be pending at once.
pub const EVENT_QUEUE_CAPACITY: usize = 8;

#[derive(Debug, Clone)]
pub enum Event {
    /// The clock ticked; `changed` lists every unit that rolled over.
    Tick {
        time: LocalTime,
        changed: EnumSet<TimeUnit>,
    },
    Battery(BatteryChargeState),
    Health(HealthEvent),
    /// An inbound companion message.
    Message(Message),
    /// The weather poll timer fired.
    WeatherTimer,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Tick { .. } => "Tick",
            Event::Battery(_) => "Battery",
            Event::Health(_) => "Health",
            Event::Message(_) => "Message",
            Event::WeatherTimer => "WeatherTimer",
        }
    }
}

/// Queue shared between event sources and the engine.
pub type EventQueue = Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_CAPACITY>;

/// Post an event without blocking. Returns `false` and drops the event if
/// the queue is full.
pub fn post(queue: &EventQueue, event: Event) -> bool {
    match queue.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            warn!("Event queue full, dropping {} event", event.name());
            false
        }
    }
}
