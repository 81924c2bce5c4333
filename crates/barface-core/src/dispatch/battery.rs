//! Battery dispatcher

use log::debug;

use crate::catalog::BarKind;
use crate::platform::BatteryChargeState;
use crate::state::BarTable;

/// Rewrite the battery bar from a charge snapshot.
pub fn handle_battery(table: &mut BarTable, state: &BatteryChargeState) -> bool {
    debug!(
        "Battery at {}% (charging: {}, plugged: {})",
        state.charge_percent, state.is_charging, state.is_plugged
    );
    table[BarKind::Battery].set(
        f32::from(state.charge_percent) / 100.0,
        format_args!("{}%", state.charge_percent),
    );
    true
}
