//! Hardware-independent core library for barface
//!
//! This crate contains the platform-agnostic engine of the barface status
//! display: a fixed table of progress bars (time, date, temperature, steps,
//! battery), the dispatchers that keep it current from independent event
//! sources, the layout and render passes, and the settings/persistence
//! plumbing around them.
//!
//! It is `#![no_std]` and allocation-free so it runs on small embedded
//! targets, and it compiles on desktop hosts for the simulator and tests.

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod framebuffer;
pub mod layout;
pub mod message;
pub mod platform;
pub mod render;
pub mod settings;
pub mod state;
pub mod storage;
pub mod time;

#[cfg(test)]
mod testing;

pub use app::BarFace;
pub use catalog::BarKind;
pub use error::BarFaceError;
pub use events::{Event, EventQueue};
pub use platform::Platform;
pub use settings::Settings;

/// Display width in pixels.
pub const DISPLAY_WIDTH_PX: u32 = 144;

/// Display height in pixels.
pub const DISPLAY_HEIGHT_PX: u32 = 168;
