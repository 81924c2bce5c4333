//! Desktop simulator for the barface status display.
//!
//! Runs the barface-core engine in an SDL2 window via
//! `embedded-graphics-simulator`, with the host clock and synthetic battery,
//! step and weather sources. Settings changes are sent through the same
//! message path a companion app would use.
//!
//! Settings and the last temperature and step count are stored under
//! `$BARFACE_STORE_DIR` (default `<temp>/barface`). Set `RUST_LOG=debug` for
//! per-event logs.
//!
//! # Key bindings
//!
//! | Key | Action                                   |
//! |-----|------------------------------------------|
//! | S   | Toggle the seconds bar                   |
//! | H   | Combined / separate hours and minutes    |
//! | D   | Combined / separate month and day        |
//! | B   | Toggle the battery bar                   |
//! | P   | Toggle the steps bar                     |
//! | E   | Toggle the temperature bar               |
//! | T   | Switch Fahrenheit / Celsius              |
//! | O   | Switch solid / outline bars              |
//! | F   | Switch 12 / 24 hour clock                |
//! | W   | Poll the weather now                     |
//! | 0   | Try to hide every bar (rejected)         |
//! | Q   | Quit                                     |

mod platform;
mod store;

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info, warn};

use barface_core::events::{self, Event, EventQueue};
use barface_core::framebuffer::FrameBuffer;
use barface_core::message::{Message, MessageKey, MessageValue, Tuple};
use barface_core::settings::{BarStyle, Settings, TemperatureScale};
use barface_core::{BarFace, BarKind, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

use crate::platform::SimPlatform;
use crate::store::FileStore;

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 3;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

static EVENTS: EventQueue = EventQueue::new();

// ---------------------------------------------------------------------------
// Settings messages
// ---------------------------------------------------------------------------

fn checkbox(kind: BarKind, shown: bool) -> Tuple {
    (MessageKey::BarCheckbox(kind), MessageValue::Int(i32::from(shown)))
}

/// Swap a combined bar with the pair of separate bars it replaces.
fn swap_combined(settings: &Settings, combined: BarKind, separate: [BarKind; 2]) -> Vec<Tuple> {
    let show_combined = !settings.is_shown(combined);
    let mut tuples = vec![checkbox(combined, show_combined)];
    tuples.extend(separate.map(|kind| checkbox(kind, !show_combined)));
    tuples
}

/// Map a key to the settings tuples it changes.
fn settings_change(keycode: Keycode, settings: &Settings) -> Option<Vec<Tuple>> {
    let toggle = |kind: BarKind| vec![checkbox(kind, !settings.is_shown(kind))];
    let tuples = match keycode {
        Keycode::S => toggle(BarKind::Seconds),
        Keycode::B => toggle(BarKind::Battery),
        Keycode::P => toggle(BarKind::Steps),
        Keycode::E => toggle(BarKind::Temperature),
        Keycode::H => swap_combined(
            settings,
            BarKind::CombinedHoursMinutes,
            [BarKind::Hours, BarKind::Minutes],
        ),
        Keycode::D => swap_combined(
            settings,
            BarKind::CombinedMonthDay,
            [BarKind::Month, BarKind::DayOfMonth],
        ),
        Keycode::T => {
            let scale = match settings.temperature_scale {
                TemperatureScale::Fahrenheit => "C",
                TemperatureScale::Celsius => "F",
            };
            vec![(MessageKey::TemperatureScale, MessageValue::text(scale))]
        }
        Keycode::O => {
            let style = match settings.bar_style {
                BarStyle::Solid => "O",
                BarStyle::Outline => "S",
            };
            vec![(MessageKey::BarStyle, MessageValue::text(style))]
        }
        Keycode::Num0 | Keycode::Kp0 => BarKind::ALL
            .iter()
            .map(|&kind| checkbox(kind, false))
            .collect(),
        _ => return None,
    };
    Some(tuples)
}

/// Wrap settings tuples into a companion message.
fn settings_message(tuples: Vec<Tuple>) -> Message {
    let mut message = Message::new();
    let marker = (MessageKey::SettingsMessage, MessageValue::Int(1));
    for tuple in std::iter::once(marker).chain(tuples) {
        if message.push(tuple).is_err() {
            warn!("Settings message truncated");
            break;
        }
    }
    message
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting barface simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: S=Seconds  H=Hours  D=Date  B=Battery  P=Steps  E=Temp");
    info!("      T=Scale  O=Style  F=12/24h  W=Weather  0=NoBars  Q=Quit");

    let store = FileStore::from_env();
    info!("Storing settings in {}", store.dir().display());
    let mut platform = SimPlatform::new(store);

    let mut display =
        SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Barface Simulator", &output_settings);

    let mut framebuffer = FrameBuffer::new();
    let mut face = BarFace::new();
    if let Err(e) = face.start(&mut platform) {
        error!("Startup failed: {}", e);
    }

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = display.clear(Rgb565::BLACK);
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::W => platform.expire_weather_timer(),
                    Keycode::F => {
                        platform.clock_24h = !platform.clock_24h;
                        info!("24-hour clock: {}", platform.clock_24h);
                        if let Err(e) = face.reconcile(&mut platform) {
                            error!("Reconcile failed: {}", e);
                        }
                    }
                    _ => {
                        if let Some(tuples) = settings_change(keycode, face.settings()) {
                            info!("Sending settings change for {:?}", keycode);
                            events::post(&EVENTS, Event::Message(settings_message(tuples)));
                        }
                    }
                },

                _ => {}
            }
        }

        // --- Event sources ------------------------------------------------
        platform.poll(&EVENTS);
        face.process_queue(&mut platform, &EVENTS);

        // --- Render -------------------------------------------------------
        if face.is_dirty() {
            if let Err(e) = face.draw(&mut framebuffer) {
                error!("Draw error: {:?}", e);
            }
            if let Err(e) = framebuffer.flush(&mut display) {
                error!("Flush error: {:?}", e);
            }
            face.mark_clean();
        }

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}
