//! The display engine context
//!
//! [`BarFace`] owns the settings, the bar table and the current layout. The
//! host feeds it [`Event`]s and asks it to draw whenever it is dirty:
//!
//! ```ignore
//! let mut face = BarFace::new();
//! face.start(&mut platform)?;
//! loop {
//!     face.process_queue(&mut platform, &QUEUE);
//!     if face.is_dirty() {
//!         face.draw(&mut display)?;
//!         face.mark_clean();
//!     }
//! }
//! ```

use embedded_graphics::Drawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;
use enumset::EnumSet;
use log::{error, info, warn};

use crate::DISPLAY_HEIGHT_PX;
use crate::catalog::BarKind;
use crate::dispatch::{activity, battery, clock, weather};
use crate::error::BarFaceError;
use crate::events::{Event, EventQueue};
use crate::layout::Layout;
use crate::message::{self, MessageKey, Tuple};
use crate::platform::Platform;
use crate::render::BarsView;
use crate::settings::Settings;
use crate::state::BarTable;
use crate::storage::{self, StorageKey};
use crate::time::TimeUnit;

pub struct BarFace {
    settings: Settings,
    table: BarTable,
    /// `None` until the first successful reconcile.
    layout: Option<Layout>,
    tick_resolution: Option<TimeUnit>,
    dirty: bool,
}

impl Default for BarFace {
    fn default() -> Self {
        Self::new()
    }
}

impl BarFace {
    /// An engine with default settings. Nothing is shown until
    /// [`start`](Self::start) or [`reconcile`](Self::reconcile) runs.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            table: BarTable::new(),
            layout: None,
            tick_resolution: None,
            dirty: true,
        }
    }

    /// Load saved settings, bring every bar up to date and arm the weather
    /// poll timer.
    pub fn start<P>(&mut self, platform: &mut P) -> Result<(), BarFaceError>
    where
        P: Platform + ?Sized,
    {
        self.settings = storage::load_settings(platform);
        let result = self.reconcile(platform);
        platform.schedule_weather_poll(weather::WEATHER_UPDATE_INTERVAL);
        result
    }

    /// Re-derive everything that depends on the settings.
    ///
    /// Recomputes the layout, adjusts the battery, activity and clock
    /// subscriptions, reseeds bars from the platform and from persisted
    /// values, and forces a full clock pass. Running it twice with unchanged
    /// settings leaves the table and layout unchanged.
    ///
    /// Fails without touching any subscription if no bar is enabled.
    pub fn reconcile<P>(&mut self, platform: &mut P) -> Result<(), BarFaceError>
    where
        P: Platform + ?Sized,
    {
        platform.pulse();

        let layout = Layout::compute(self.settings.enabled_count(), DISPLAY_HEIGHT_PX)?;
        self.layout = Some(layout);

        if self.settings.is_shown(BarKind::Battery) {
            battery::handle_battery(&mut self.table, &platform.peek_battery());
            platform.subscribe_battery();
        } else {
            platform.unsubscribe_battery();
        }

        if self.settings.is_shown(BarKind::Steps) {
            if let Some(steps) = storage::load_i32(&*platform, StorageKey::Steps) {
                activity::update_steps(&mut self.table, u32::try_from(steps).unwrap_or(0));
            }
            platform.subscribe_health();
        } else {
            platform.unsubscribe_health();
        }

        // A new tick subscription replaces the previous one.
        let resolution = if self.settings.is_shown(BarKind::Seconds) {
            TimeUnit::Second
        } else {
            TimeUnit::Minute
        };
        platform.subscribe_ticks(resolution);
        self.tick_resolution = Some(resolution);

        clock::handle_tick(
            &mut self.table,
            &self.settings,
            &platform.now(),
            EnumSet::all(),
            platform.is_24h_style(),
        );

        if self.settings.is_shown(BarKind::Temperature)
            && let Some(fahrenheit) = storage::load_i32(&*platform, StorageKey::Temperature)
        {
            weather::update_temperature(&mut self.table, &self.settings, fahrenheit);
        }

        self.dirty = true;
        info!(
            "Showing {} bars, {:.1}px each, ticking every {:?}",
            layout.bar_count(),
            layout.bar_height(),
            resolution
        );
        Ok(())
    }

    /// Apply a settings message, then reconcile and save.
    ///
    /// If the new settings cannot be displayed, the previous settings are
    /// restored and nothing is saved.
    pub fn handle_settings_message<P>(
        &mut self,
        platform: &mut P,
        tuples: &[Tuple],
    ) -> Result<(), BarFaceError>
    where
        P: Platform + ?Sized,
    {
        let previous = self.settings.clone();
        message::apply_settings_message(&mut self.settings, tuples);

        if let Err(e) = self.reconcile(platform) {
            warn!("Rejecting settings update: {}", e);
            self.settings = previous;
            return Err(e);
        }

        storage::save_settings(platform, &self.settings)?;
        Ok(())
    }

    /// Route an inbound companion message.
    ///
    /// A message may carry settings, a temperature reading, or both.
    pub fn handle_message<P>(
        &mut self,
        platform: &mut P,
        tuples: &[Tuple],
    ) -> Result<(), BarFaceError>
    where
        P: Platform + ?Sized,
    {
        let result = if message::is_settings_message(tuples) {
            self.handle_settings_message(platform, tuples)
        } else {
            Ok(())
        };

        if let Some(fahrenheit) = message::find_int(tuples, MessageKey::Temperature) {
            self.handle_temperature_received(platform, fahrenheit);
        }
        result
    }

    pub fn handle_temperature_received<P>(&mut self, platform: &mut P, fahrenheit: i32)
    where
        P: Platform + ?Sized,
    {
        if weather::handle_temperature_received(
            &mut self.table,
            &self.settings,
            platform,
            fahrenheit,
        ) {
            self.dirty = true;
        }
    }

    pub fn handle_weather_timer<P>(&mut self, platform: &mut P)
    where
        P: Platform + ?Sized,
    {
        weather::handle_poll_timer(&self.settings, platform);
    }

    pub fn handle_event<P>(&mut self, platform: &mut P, event: Event) -> Result<(), BarFaceError>
    where
        P: Platform + ?Sized,
    {
        let redraw = match event {
            Event::Tick { time, changed } => clock::handle_tick(
                &mut self.table,
                &self.settings,
                &time,
                changed,
                platform.is_24h_style(),
            ),
            Event::Battery(state) => battery::handle_battery(&mut self.table, &state),
            Event::Health(health) => {
                activity::handle_health_event(&mut self.table, &self.settings, platform, health)
            }
            Event::Message(tuples) => return self.handle_message(platform, &tuples),
            Event::WeatherTimer => {
                self.handle_weather_timer(platform);
                false
            }
        };
        self.dirty |= redraw;
        Ok(())
    }

    /// Handle every pending event in order. Returns the number handled.
    ///
    /// Errors are logged; they never stop the queue from draining.
    pub fn process_queue<P>(&mut self, platform: &mut P, queue: &EventQueue) -> usize
    where
        P: Platform + ?Sized,
    {
        let mut handled = 0;
        while let Ok(event) = queue.try_receive() {
            let name = event.name();
            if let Err(e) = self.handle_event(platform, event) {
                error!("Failed to handle {} event: {}", name, e);
            }
            handled += 1;
        }
        handled
    }

    /// Draw the full frame. Before the first reconcile only the background
    /// is drawn.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match &self.layout {
            Some(layout) => BarsView::new(&self.settings, &self.table, layout).draw(target),
            None => target.clear(self.background_color()),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn request_redraw(&mut self) {
        self.dirty = true;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn table(&self) -> &BarTable {
        &self.table
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Resolution of the current clock subscription.
    pub fn tick_resolution(&self) -> Option<TimeUnit> {
        self.tick_resolution
    }

    pub fn background_color(&self) -> Rgb565 {
        self.settings.background_color.to_rgb565()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::events;
    use crate::framebuffer::FrameBuffer;
    use crate::message::{Message, MessageValue};
    use crate::platform::HealthEvent;
    use crate::settings::TemperatureScale;
    use crate::storage::{KeyValueStore, SETTINGS_SCHEMA_VERSION};
    use crate::testing::{LEAP_DAY_AFTERNOON, MockPlatform};
    use crate::time::LocalTime;

    fn started() -> (BarFace, MockPlatform) {
        let mut platform = MockPlatform::new();
        let mut face = BarFace::new();
        face.start(&mut platform).unwrap();
        (face, platform)
    }

    fn int(key: MessageKey, value: i32) -> Tuple {
        (key, MessageValue::Int(value))
    }

    fn message(tuples: &[Tuple]) -> Message {
        Message::from_slice(tuples).unwrap()
    }

    #[test]
    fn test_start_with_empty_store() {
        let (face, platform) = started();

        assert_eq!(face.settings(), &Settings::default());
        assert_eq!(face.layout().map(Layout::bar_count), Some(7));
        assert_eq!(face.tick_resolution(), Some(TimeUnit::Second));
        assert_eq!(platform.tick_unit, Some(TimeUnit::Second));
        assert!(platform.battery_subscribed);
        assert!(platform.health_subscribed);
        assert_eq!(platform.backlight_pulses, 1);
        assert_eq!(platform.scheduled_polls, [weather::WEATHER_UPDATE_INTERVAL]);
        assert!(face.is_dirty());

        let table = face.table();
        assert_eq!(table[BarKind::CombinedHoursMinutes].label.as_str(), "13:05");
        assert_eq!(table[BarKind::Seconds].label.as_str(), "07s");
        assert_eq!(table[BarKind::Weekday].label.as_str(), "Thu");
        assert_eq!(table[BarKind::CombinedMonthDay].label.as_str(), "Feb 29");
        assert_eq!(table[BarKind::Battery].label.as_str(), "70%");
        // Nothing persisted yet.
        assert!(table[BarKind::Temperature].label.is_empty());
        assert!(table[BarKind::Steps].label.is_empty());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let (mut face, mut platform) = started();
        platform.store.write(StorageKey::Steps, &1234i32.to_le_bytes()).unwrap();
        face.reconcile(&mut platform).unwrap();

        let table = face.table().clone();
        let layout = face.layout().copied();
        face.reconcile(&mut platform).unwrap();
        assert_eq!(face.table(), &table);
        assert_eq!(face.layout().copied(), layout);
    }

    #[test]
    fn test_start_seeds_persisted_values() {
        let mut platform = MockPlatform::new();
        storage::write_i32(&mut platform, StorageKey::Temperature, 68).unwrap();
        storage::write_i32(&mut platform, StorageKey::Steps, 12_500).unwrap();

        let mut face = BarFace::new();
        face.start(&mut platform).unwrap();
        assert_eq!(face.table()[BarKind::Temperature].label.as_str(), "68\u{00B0}F");
        assert_eq!(face.table()[BarKind::Steps].label.as_str(), "12500");
        assert_eq!(face.table()[BarKind::Steps].progress, 1.25);
    }

    #[test]
    fn test_start_loads_saved_settings() {
        let mut platform = MockPlatform::new();
        let mut saved = Settings::default();
        saved.set_shown(BarKind::Seconds, false);
        saved.set_shown(BarKind::Battery, false);
        storage::save_settings(&mut platform, &saved).unwrap();

        let mut face = BarFace::new();
        face.start(&mut platform).unwrap();
        assert_eq!(face.settings(), &saved);
        assert_eq!(face.layout().map(Layout::bar_count), Some(5));
        assert_eq!(platform.tick_unit, Some(TimeUnit::Minute));
        assert!(!platform.battery_subscribed);
    }

    #[test]
    fn test_start_discards_stale_settings() {
        let mut platform = MockPlatform::new();
        let mut saved = Settings::default();
        saved.set_shown(BarKind::Seconds, false);
        storage::save_settings(&mut platform, &saved).unwrap();
        storage::write_i32(&mut platform, StorageKey::Version, SETTINGS_SCHEMA_VERSION - 1)
            .unwrap();

        let mut face = BarFace::new();
        face.start(&mut platform).unwrap();
        assert_eq!(face.settings(), &Settings::default());
        assert!(!platform.exists(StorageKey::Settings));
    }

    #[test]
    fn test_settings_message_reconciles_and_saves() {
        let (mut face, mut platform) = started();
        let tuples = [
            int(MessageKey::SettingsMessage, 1),
            int(MessageKey::BarCheckbox(BarKind::Seconds), 0),
            int(MessageKey::BarCheckbox(BarKind::Steps), 0),
            (MessageKey::TemperatureScale, MessageValue::text("C")),
        ];
        face.handle_message(&mut platform, &tuples).unwrap();

        assert_eq!(platform.tick_unit, Some(TimeUnit::Minute));
        assert!(!platform.health_subscribed);
        assert_eq!(platform.backlight_pulses, 2);
        assert_eq!(face.layout().map(Layout::bar_count), Some(5));
        assert_eq!(storage::load_settings(&mut platform), *face.settings());
        assert_eq!(
            face.settings().temperature_scale,
            TemperatureScale::Celsius
        );
    }

    #[test]
    fn test_zero_bar_settings_are_rejected() {
        let (mut face, mut platform) = started();
        let layout = face.layout().copied();

        let mut tuples = vec![int(MessageKey::SettingsMessage, 1)];
        tuples.extend(
            BarKind::ALL
                .iter()
                .map(|&kind| int(MessageKey::BarCheckbox(kind), 0)),
        );

        assert_eq!(
            face.handle_message(&mut platform, &tuples),
            Err(BarFaceError::Layout(LayoutError::NoBarsEnabled))
        );
        assert_eq!(face.settings(), &Settings::default());
        assert_eq!(face.layout().copied(), layout);
        assert!(!platform.exists(StorageKey::Settings));
        // Subscriptions are untouched.
        assert!(platform.battery_subscribed);
        assert_eq!(platform.tick_unit, Some(TimeUnit::Second));
    }

    #[test]
    fn test_message_without_marker_is_not_settings() {
        let (mut face, mut platform) = started();
        let tuples = [
            int(MessageKey::SettingsMessage, 0),
            int(MessageKey::BarCheckbox(BarKind::Seconds), 0),
        ];
        face.handle_message(&mut platform, &tuples).unwrap();
        assert!(face.settings().is_shown(BarKind::Seconds));
        assert_eq!(platform.backlight_pulses, 1);
    }

    #[test]
    fn test_temperature_message() {
        let (mut face, mut platform) = started();
        face.mark_clean();

        face.handle_message(&mut platform, &[int(MessageKey::Temperature, 68)])
            .unwrap();
        assert_eq!(face.table()[BarKind::Temperature].label.as_str(), "68\u{00B0}F");
        assert!(face.is_dirty());

        // Switching the scale relabels the persisted reading.
        let tuples = [
            int(MessageKey::SettingsMessage, 1),
            (MessageKey::TemperatureScale, MessageValue::text("Celsius")),
        ];
        face.handle_message(&mut platform, &tuples).unwrap();
        assert_eq!(face.table()[BarKind::Temperature].label.as_str(), "20\u{00B0}C");
    }

    #[test]
    fn test_enabling_combined_bar_freezes_separate_bars() {
        let mut platform = MockPlatform::new();
        let mut settings = Settings::default();
        settings.set_shown(BarKind::CombinedHoursMinutes, false);
        settings.set_shown(BarKind::Hours, true);
        settings.set_shown(BarKind::Minutes, true);
        let mut face = BarFace::with_settings(settings);
        face.reconcile(&mut platform).unwrap();
        assert_eq!(face.table()[BarKind::Minutes].label.as_str(), "05m");

        let tuples = [
            int(MessageKey::SettingsMessage, 1),
            int(MessageKey::BarCheckbox(BarKind::CombinedHoursMinutes), 1),
        ];
        face.handle_message(&mut platform, &tuples).unwrap();

        let later = LocalTime {
            minute: 6,
            ..LEAP_DAY_AFTERNOON
        };
        face.handle_event(
            &mut platform,
            Event::Tick {
                time: later,
                changed: EnumSet::only(TimeUnit::Minute),
            },
        )
        .unwrap();
        assert_eq!(face.table()[BarKind::Minutes].label.as_str(), "05m");
        assert_eq!(face.table()[BarKind::Hours].label.as_str(), "13h");
        assert_eq!(face.table()[BarKind::CombinedHoursMinutes].label.as_str(), "13:06");
    }

    #[test]
    fn test_process_queue_drains_in_order() {
        let (mut face, mut platform) = started();
        face.mark_clean();
        platform.steps = Some(800);

        let queue = EventQueue::new();
        assert!(events::post(&queue, Event::Health(HealthEvent::MovementUpdate)));
        assert!(events::post(
            &queue,
            Event::Message(message(&[int(MessageKey::Temperature, 50)]))
        ));
        assert!(events::post(&queue, Event::WeatherTimer));
        assert!(events::post(
            &queue,
            Event::Message(message(&[
                int(MessageKey::SettingsMessage, 1),
                int(MessageKey::BarCheckbox(BarKind::Temperature), 0),
            ]))
        ));
        assert!(events::post(&queue, Event::WeatherTimer));

        assert_eq!(face.process_queue(&mut platform, &queue), 5);
        assert_eq!(face.process_queue(&mut platform, &queue), 0);
        assert!(face.is_dirty());
        assert_eq!(face.table()[BarKind::Steps].label.as_str(), "800");
        assert_eq!(face.table()[BarKind::Temperature].label.as_str(), "50\u{00B0}F");
        // Only the first timer fired while the temperature bar was shown.
        assert_eq!(platform.temperature_requests, 1);
        assert_eq!(platform.scheduled_polls.len(), 3);
    }

    #[test]
    fn test_minute_ticks_without_seconds_bar() {
        let mut platform = MockPlatform::new();
        let mut settings = Settings::default();
        settings.set_shown(BarKind::Seconds, false);
        let mut face = BarFace::with_settings(settings);
        face.reconcile(&mut platform).unwrap();
        face.mark_clean();

        let tick = |changed| Event::Tick {
            time: LEAP_DAY_AFTERNOON,
            changed,
        };
        face.handle_event(&mut platform, tick(EnumSet::only(TimeUnit::Second)))
            .unwrap();
        assert!(!face.is_dirty());
        face.handle_event(&mut platform, tick(TimeUnit::Second | TimeUnit::Minute))
            .unwrap();
        assert!(face.is_dirty());
    }

    #[test]
    fn test_draw_before_and_after_start() {
        let mut fb = FrameBuffer::new();
        let mut settings = Settings::default();
        settings.background_color = crate::settings::HexColor::new(0x00_00_FF);

        let mut face = BarFace::with_settings(settings);
        face.draw(&mut fb).unwrap();
        assert_eq!(fb.pixel(0, 0), Some(Rgb565::new(0, 0, 31)));

        let mut platform = MockPlatform::new();
        face.reconcile(&mut platform).unwrap();
        face.draw(&mut fb).unwrap();
        // The first bar (combined hours and minutes) starts at y = 8.
        let bar_color = BarKind::CombinedHoursMinutes.default_color().to_rgb565();
        assert_eq!(fb.pixel(0, 9), Some(bar_color));
        assert_eq!(fb.pixel(0, 4), Some(Rgb565::new(0, 0, 31)));
    }
}
