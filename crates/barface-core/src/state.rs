//! Per-bar progress and label state
//!
//! [`BarTable`] is the single source of truth the renderer reads. Each entry
//! is written only by the dispatcher that owns its [`BarKind`].

use core::fmt::{self, Write};
use core::ops::{Index, IndexMut};

use crate::catalog::BarKind;

/// Maximum label length in bytes.
pub const LABEL_CAPACITY: usize = 7;

/// Fixed-capacity label text.
pub type Label = heapless::String<LABEL_CAPACITY>;

/// Progress fraction and label of one bar.
///
/// `progress` is nominally in `[0.0, 1.0]` but is never clamped here: values
/// outside that range mean the data is off the chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarState {
    pub progress: f32,
    pub label: Label,
}

impl BarState {
    /// Overwrite both the progress and the label.
    pub fn set(&mut self, progress: f32, label: fmt::Arguments<'_>) {
        self.progress = progress;
        write_label(&mut self.label, label);
    }
}

/// Replace `label` with the formatted text, truncating at the capacity.
///
/// Truncation always happens on a character boundary and stops at the first
/// character that does not fit, so the label is a prefix of the full text.
pub fn write_label(label: &mut Label, args: fmt::Arguments<'_>) {
    label.clear();
    let mut writer = TruncatingWriter {
        label,
        full: false,
    };
    // The writer never reports an error.
    let _ = writer.write_fmt(args);
}

struct TruncatingWriter<'a> {
    label: &'a mut Label,
    full: bool,
}

impl Write for TruncatingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Ok(());
        }
        for c in s.chars() {
            if self.label.push(c).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

/// One [`BarState`] per [`BarKind`], indexed by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarTable {
    bars: [BarState; BarKind::COUNT],
}

impl BarTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: BarKind) -> &BarState {
        &self.bars[kind.index()]
    }

    pub fn get_mut(&mut self, kind: BarKind) -> &mut BarState {
        &mut self.bars[kind.index()]
    }

    /// Iterate every entry in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (BarKind, &BarState)> {
        BarKind::ALL.into_iter().zip(self.bars.iter())
    }
}

impl Index<BarKind> for BarTable {
    type Output = BarState;

    fn index(&self, kind: BarKind) -> &BarState {
        self.get(kind)
    }
}

impl IndexMut<BarKind> for BarTable {
    fn index_mut(&mut self, kind: BarKind) -> &mut BarState {
        self.get_mut(kind)
    }
}
