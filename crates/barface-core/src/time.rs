//! Broken-down local time and calendar helpers

use enumset::{EnumSet, EnumSetType};

/// A calendar unit that a clock tick can report as changed.
///
/// Units are ordered from finest to coarsest.
#[derive(EnumSetType, Debug)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl TimeUnit {
    /// This unit and every coarser one.
    ///
    /// A tick subscription at this resolution fires whenever any of these
    /// units changes.
    pub fn and_coarser(self) -> EnumSet<TimeUnit> {
        EnumSet::<TimeUnit>::all()
            .iter()
            .filter(|unit| *unit as u8 >= self as u8)
            .collect()
    }
}

/// Local wall-clock time, broken down the way the bars consume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalTime {
    /// 0..=59
    pub second: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=23
    pub hour: u8,
    /// Days since Sunday, 0..=6
    pub weekday: u8,
    /// 1..=31
    pub day_of_month: u8,
    /// Months since January, 0..=11
    pub month: u8,
    /// Full Gregorian year, e.g. 2024
    pub year: i32,
    /// Days since January 1st, 0..=365
    pub day_of_year: u16,
}

pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Proleptic Gregorian leap year rule.
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` (0-based) of `year`.
pub const fn days_in_month(month: u8, year: i32) -> u8 {
    match month {
        // April, June, September, November
        3 | 5 | 8 | 10 => 30,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

impl LocalTime {
    pub fn weekday_abbreviation(&self) -> &'static str {
        WEEKDAY_ABBREVIATIONS[usize::from(self.weekday % 7)]
    }

    pub fn month_abbreviation(&self) -> &'static str {
        MONTH_ABBREVIATIONS[usize::from(self.month % 12)]
    }

    /// Hour on a 12-hour dial, 1..=12.
    pub fn hour_12(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }

    /// Lowercase am/pm marker.
    pub fn meridiem(&self) -> &'static str {
        if self.hour < 12 { "am" } else { "pm" }
    }

    pub fn days_in_month(&self) -> u8 {
        days_in_month(self.month, self.year)
    }
}

/// Units that differ between two successive readings of the clock.
///
/// A day rollover is detected from the date fields, so it is reported even
/// when the weekday happens to be unchanged.
pub fn changed_units(previous: &LocalTime, current: &LocalTime) -> EnumSet<TimeUnit> {
    let mut changed = EnumSet::new();
    if previous.second != current.second {
        changed.insert(TimeUnit::Second);
    }
    if previous.minute != current.minute {
        changed.insert(TimeUnit::Minute);
    }
    if previous.hour != current.hour {
        changed.insert(TimeUnit::Hour);
    }
    if previous.day_of_month != current.day_of_month
        || previous.month != current.month
        || previous.year != current.year
    {
        changed.insert(TimeUnit::Day);
    }
    if previous.month != current.month || previous.year != current.year {
        changed.insert(TimeUnit::Month);
    }
    if previous.year != current.year {
        changed.insert(TimeUnit::Year);
    }
    changed
}
