//! Clock dispatcher: time and date bars

use enumset::EnumSet;
use log::debug;

use crate::catalog::BarKind;
use crate::settings::Settings;
use crate::state::BarTable;
use crate::time::{LocalTime, TimeUnit};

const MINUTES_PER_DAY: f32 = 24.0 * 60.0;
const MINUTES_PER_HALF_DAY: f32 = 12.0 * 60.0;

/// Recompute every enabled time/date bar whose unit is in `changed`.
///
/// Separate bars are left untouched while the combined bar that replaces them
/// is shown. Returns `true` when the display should be redrawn: on every
/// minute, and on every second while the seconds bar is shown.
pub fn handle_tick(
    table: &mut BarTable,
    settings: &Settings,
    time: &LocalTime,
    changed: EnumSet<TimeUnit>,
    clock_24h: bool,
) -> bool {
    let shows = |kind: BarKind| settings.is_shown(kind) && !settings.is_superseded(kind);

    if changed.contains(TimeUnit::Second) && shows(BarKind::Seconds) {
        table[BarKind::Seconds].set(
            f32::from(time.second) / 60.0,
            format_args!("{:02}s", time.second),
        );
    }

    if changed.contains(TimeUnit::Minute) {
        if shows(BarKind::CombinedHoursMinutes) {
            update_hours_minutes(table, time, clock_24h);
        }
        if shows(BarKind::Minutes) {
            table[BarKind::Minutes].set(
                f32::from(time.minute) / 60.0,
                format_args!("{:02}m", time.minute),
            );
        }
    }

    if changed.contains(TimeUnit::Hour) && shows(BarKind::Hours) {
        let bar = &mut table[BarKind::Hours];
        if clock_24h {
            bar.set(
                f32::from(time.hour) / 24.0,
                format_args!("{:02}h", time.hour),
            );
        } else {
            bar.set(
                f32::from(time.hour % 12) / 12.0,
                format_args!("{:02}{}", time.hour_12(), time.meridiem()),
            );
        }
    }

    if changed.contains(TimeUnit::Day) {
        if shows(BarKind::Weekday) {
            table[BarKind::Weekday].set(
                f32::from(time.weekday) / 7.0,
                format_args!("{}", time.weekday_abbreviation()),
            );
        }
        if shows(BarKind::DayOfMonth) {
            table[BarKind::DayOfMonth].set(
                f32::from(time.day_of_month) / f32::from(time.days_in_month()),
                format_args!("{:02}", time.day_of_month),
            );
        }
        if shows(BarKind::CombinedMonthDay) {
            // Leap days are not accounted for; Dec 31st of a leap year reads 1.0.
            table[BarKind::CombinedMonthDay].set(
                f32::from(time.day_of_year) / 365.0,
                format_args!("{} {:02}", time.month_abbreviation(), time.day_of_month),
            );
        }
    }

    if changed.contains(TimeUnit::Month) && shows(BarKind::Month) {
        table[BarKind::Month].set(
            f32::from(time.month) / 12.0,
            format_args!("{}", time.month_abbreviation()),
        );
    }

    debug!(
        "Clock tick {:02}:{:02}:{:02}, changed {:?}",
        time.hour, time.minute, time.second, changed
    );

    (changed.contains(TimeUnit::Second) && settings.is_shown(BarKind::Seconds))
        || changed.contains(TimeUnit::Minute)
}

fn update_hours_minutes(table: &mut BarTable, time: &LocalTime, clock_24h: bool) {
    let bar = &mut table[BarKind::CombinedHoursMinutes];
    let minute = u16::from(time.minute);
    if clock_24h {
        let elapsed = u16::from(time.hour) * 60 + minute;
        bar.set(
            f32::from(elapsed) / MINUTES_PER_DAY,
            format_args!("{:02}:{:02}", time.hour, time.minute),
        );
    } else {
        let elapsed = u16::from(time.hour % 12) * 60 + minute;
        bar.set(
            f32::from(elapsed) / MINUTES_PER_HALF_DAY,
            format_args!(
                "{:02}:{:02}{}",
                time.hour_12(),
                time.minute,
                time.meridiem()
            ),
        );
    }
}
