//! The fixed catalog of bars
//!
//! Every bar the display can show is one [`BarKind`]. The declaration order
//! is the catalog order: bars are always stacked top to bottom in this order,
//! whichever subset happens to be enabled.

use enumset::{EnumSet, EnumSetType, enum_set};

use crate::settings::HexColor;

/// One horizontal bar and the data facet it represents.
///
/// The combined kinds replace a pair of separate kinds: showing
/// [`BarKind::CombinedHoursMinutes`] stops updates to [`BarKind::Hours`] and
/// [`BarKind::Minutes`], and [`BarKind::CombinedMonthDay`] does the same for
/// [`BarKind::Month`] and [`BarKind::DayOfMonth`].
#[derive(EnumSetType, Debug)]
pub enum BarKind {
    Hours,
    Minutes,
    CombinedHoursMinutes,
    Seconds,
    Weekday,
    Month,
    DayOfMonth,
    CombinedMonthDay,
    Temperature,
    Steps,
    Battery,
}

impl BarKind {
    /// Number of bar kinds in the catalog.
    pub const COUNT: usize = 11;

    /// All kinds, in catalog order.
    pub const ALL: [BarKind; Self::COUNT] = [
        BarKind::Hours,
        BarKind::Minutes,
        BarKind::CombinedHoursMinutes,
        BarKind::Seconds,
        BarKind::Weekday,
        BarKind::Month,
        BarKind::DayOfMonth,
        BarKind::CombinedMonthDay,
        BarKind::Temperature,
        BarKind::Steps,
        BarKind::Battery,
    ];

    /// Position of this kind in the catalog (and in per-bar tables).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a kind by its catalog position.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Human-readable name, used in logs and the simulator.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hours => "Hours",
            Self::Minutes => "Minutes",
            Self::CombinedHoursMinutes => "Hours and Minutes",
            Self::Seconds => "Seconds",
            Self::Weekday => "Day of week",
            Self::Month => "Month",
            Self::DayOfMonth => "Day of month",
            Self::CombinedMonthDay => "Month and Day",
            Self::Temperature => "Temperature",
            Self::Steps => "Steps",
            Self::Battery => "Battery",
        }
    }

    /// The combined bar that supersedes this one, if any.
    pub const fn combined_with(self) -> Option<Self> {
        match self {
            Self::Hours | Self::Minutes => Some(Self::CombinedHoursMinutes),
            Self::Month | Self::DayOfMonth => Some(Self::CombinedMonthDay),
            _ => None,
        }
    }

    /// Fill color used until the user picks another one.
    pub const fn default_color(self) -> HexColor {
        match self {
            // OxfordBlue
            Self::Hours => HexColor::new(0x00_00_55),
            // DukeBlue
            Self::Minutes | Self::CombinedHoursMinutes => HexColor::new(0x00_00_AA),
            // VividCerulean
            Self::Seconds => HexColor::new(0x00_AA_FF),
            // Rajah
            Self::Weekday => HexColor::new(0xFF_AA_55),
            // Brass
            Self::Month => HexColor::new(0xAA_AA_55),
            Self::DayOfMonth | Self::CombinedMonthDay => HexColor::new(0xFF_FF_00),
            // ImperialPurple
            Self::Temperature => HexColor::new(0x55_00_55),
            // DarkGreen
            Self::Steps => HexColor::new(0x00_55_00),
            Self::Battery => HexColor::new(0xFF_00_00),
        }
    }
}

/// Bars shown on first run: both combined bars plus every non-calendar bar.
pub fn default_visible() -> EnumSet<BarKind> {
    enum_set!(
        BarKind::CombinedHoursMinutes
            | BarKind::Seconds
            | BarKind::Weekday
            | BarKind::CombinedMonthDay
            | BarKind::Temperature
            | BarKind::Steps
            | BarKind::Battery
    )
}
