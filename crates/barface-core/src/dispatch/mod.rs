//! Update dispatchers
//!
//! Each dispatcher translates one kind of external event into writes on the
//! [`BarTable`](crate::state::BarTable), touching only the bar kinds it owns:
//!
//! | Dispatcher   | Bars                                                      |
//! |--------------|-----------------------------------------------------------|
//! | [`clock`]    | Hours, Minutes, Seconds, Weekday, Month, DayOfMonth and the combined bars |
//! | [`weather`]  | Temperature                                               |
//! | [`battery`]  | Battery                                                   |
//! | [`activity`] | Steps                                                     |
//!
//! Handlers return `true` when the display should be redrawn.

pub mod activity;
pub mod battery;
pub mod clock;
pub mod weather;
