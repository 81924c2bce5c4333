//! Activity dispatcher: the daily step count

use log::{debug, warn};

use crate::catalog::BarKind;
use crate::platform::{ActivityMonitor, HealthEvent};
use crate::settings::Settings;
use crate::state::BarTable;
use crate::storage::{self, KeyValueStore, StorageKey};

/// Steps that fill the bar. Counts above the goal run past the end.
pub const STEP_GOAL: u32 = 10_000;

/// Rewrite the steps bar.
pub fn update_steps(table: &mut BarTable, steps: u32) {
    table[BarKind::Steps].set(steps as f32 / STEP_GOAL as f32, format_args!("{}", steps));
}

/// Handle a notification from the activity service.
///
/// Only step-related notifications are handled, and only while the steps bar
/// is shown. Unavailable step data counts as zero. The count is persisted so
/// a restart can show it before the first notification arrives.
pub fn handle_health_event<P>(
    table: &mut BarTable,
    settings: &Settings,
    platform: &mut P,
    event: HealthEvent,
) -> bool
where
    P: ActivityMonitor + KeyValueStore + ?Sized,
{
    if !settings.is_shown(BarKind::Steps)
        || !matches!(
            event,
            HealthEvent::SignificantUpdate | HealthEvent::MovementUpdate
        )
    {
        return false;
    }

    let steps = platform.steps_today().unwrap_or_else(|| {
        debug!("Step data unavailable, showing 0");
        0
    });
    update_steps(table, steps);

    let persisted = i32::try_from(steps).unwrap_or(i32::MAX);
    if let Err(e) = storage::write_i32(platform, StorageKey::Steps, persisted) {
        warn!("Failed to persist step count: {}", e);
    }
    true
}
