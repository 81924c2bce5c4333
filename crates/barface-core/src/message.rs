//! Inbound companion messages
//!
//! A message is a list of key/value tuples. It can carry a settings update,
//! a temperature reading, or both. Absent keys leave the corresponding
//! setting untouched; values of the wrong shape are logged and ignored.

use log::{error, warn};

use crate::catalog::BarKind;
use crate::settings::{BarStyle, HexColor, Settings, TemperatureScale};

/// Longest string value a message tuple can hold.
pub const MESSAGE_STR_CAPACITY: usize = 8;

/// Maximum number of tuples in one message.
pub const MAX_MESSAGE_TUPLES: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    /// Marks the message as a settings update when its value is positive.
    SettingsMessage,
    /// Current temperature in whole degrees Fahrenheit.
    Temperature,
    BackgroundColor,
    TextColor,
    TextOutlineColor,
    BarCheckbox(BarKind),
    BarColor(BarKind),
    TemperatureScale,
    TemperatureMinF,
    TemperatureMaxF,
    TemperatureMinC,
    TemperatureMaxC,
    BarStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageValue {
    Int(i32),
    Str(heapless::String<MESSAGE_STR_CAPACITY>),
}

impl MessageValue {
    /// Build a string value, truncated to [`MESSAGE_STR_CAPACITY`] bytes.
    pub fn text(s: &str) -> Self {
        let mut value = heapless::String::new();
        for c in s.chars() {
            if value.push(c).is_err() {
                break;
            }
        }
        Self::Str(value)
    }
}

pub type Tuple = (MessageKey, MessageValue);

/// A complete inbound message.
pub type Message = heapless::Vec<Tuple, MAX_MESSAGE_TUPLES>;

/// Find the first tuple with `key`.
pub fn find(tuples: &[Tuple], key: MessageKey) -> Option<&MessageValue> {
    tuples
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| value)
}

/// The integer value stored under `key`, if present and an integer.
pub fn find_int(tuples: &[Tuple], key: MessageKey) -> Option<i32> {
    match find(tuples, key)? {
        MessageValue::Int(value) => Some(*value),
        MessageValue::Str(text) => {
            warn!("Expected an integer for {:?}, got {:?}", key, text.as_str());
            None
        }
    }
}

/// Whether the message carries a settings update.
pub fn is_settings_message(tuples: &[Tuple]) -> bool {
    find_int(tuples, MessageKey::SettingsMessage).is_some_and(|marker| marker > 0)
}

fn find_str(tuples: &[Tuple], key: MessageKey) -> Option<&str> {
    match find(tuples, key)? {
        MessageValue::Str(text) => Some(text.as_str()),
        MessageValue::Int(value) => {
            warn!("Expected a string for {:?}, got {}", key, value);
            None
        }
    }
}

fn read_color(tuples: &[Tuple], key: MessageKey, setting: &mut HexColor) {
    if let Some(rgb) = find_int(tuples, key) {
        *setting = HexColor::new(rgb as u32);
    }
}

fn read_int(tuples: &[Tuple], key: MessageKey, setting: &mut i32) {
    if let Some(value) = find_int(tuples, key) {
        *setting = value;
    }
}

/// Apply the settings carried by `tuples` on top of `settings`.
pub fn apply_settings_message(settings: &mut Settings, tuples: &[Tuple]) {
    read_color(tuples, MessageKey::BackgroundColor, &mut settings.background_color);
    read_color(tuples, MessageKey::TextColor, &mut settings.text_color);
    read_color(
        tuples,
        MessageKey::TextOutlineColor,
        &mut settings.text_outline_color,
    );

    for kind in BarKind::ALL {
        if let Some(checked) = find_int(tuples, MessageKey::BarCheckbox(kind)) {
            settings.set_shown(kind, checked == 1);
        }
        read_color(
            tuples,
            MessageKey::BarColor(kind),
            &mut settings.bar_colors[kind.index()],
        );
    }

    if let Some(scale) = find_str(tuples, MessageKey::TemperatureScale) {
        match scale.chars().next() {
            Some('C') => settings.temperature_scale = TemperatureScale::Celsius,
            Some('F') => settings.temperature_scale = TemperatureScale::Fahrenheit,
            _ => error!("Invalid value for TemperatureScale: {:?}", scale),
        }
    }

    // Bounds arrive in both scales; keep the pair matching the selected one.
    let (min_key, max_key) = match settings.temperature_scale {
        TemperatureScale::Fahrenheit => (MessageKey::TemperatureMinF, MessageKey::TemperatureMaxF),
        TemperatureScale::Celsius => (MessageKey::TemperatureMinC, MessageKey::TemperatureMaxC),
    };
    read_int(tuples, min_key, &mut settings.temperature_min);
    read_int(tuples, max_key, &mut settings.temperature_max);

    if let Some(style) = find_str(tuples, MessageKey::BarStyle) {
        match style.chars().next() {
            Some('S') => settings.bar_style = BarStyle::Solid,
            Some('O') => settings.bar_style = BarStyle::Outline,
            _ => error!("Invalid value for BarStyle: {:?}", style),
        }
    }
}
