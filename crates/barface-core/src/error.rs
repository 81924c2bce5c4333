//! Error types for barface
//!
//! Most failures in this crate are degraded-data conditions handled where
//! they occur (logged, stale or default data kept). The types here are the
//! ones that are surfaced to callers.

use thiserror_no_std::Error;

/// The layout could not be derived from the enabled bars.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no bars are enabled")]
    NoBarsEnabled,
}

/// Persistent key/value store failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("value does not fit in its storage slot")]
    Capacity,
    #[error("stored value is corrupted")]
    Corrupted,
    #[error("value could not be encoded")]
    Encoding,
    #[error("storage I/O failed")]
    Io,
}

/// Failure to hand a request to the companion link.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    #[error("outbox is busy")]
    Busy,
    #[error("companion is not connected")]
    Disconnected,
}

/// Errors surfaced by [`BarFace`](crate::app::BarFace).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarFaceError {
    #[error("invalid configuration: {0}")]
    Layout(#[from] LayoutError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
