#![forbid(unsafe_code)]

//! Warn-dialog state machine.
//!
//! Everything interactive about the warn dialog lives here, with no
//! rendering attached. [`SelectionState`] records what the user picked
//! and keeps the severity level consistent with the selected template;
//! [`PreviewScheduler`] turns keystroke bursts into single preview
//! refreshes. [`WarnDialogController`] wires both to the embedder's
//! callbacks. Template data and the level-resolution rules come from
//! [`wikiwarn_core`].
//!
//! The crate is single-threaded. Callbacks are plain `FnMut` closures,
//! and the scheduler is driven by polling with explicit instants, so a
//! host event loop of any flavor can embed it.

pub mod controller;
pub mod scheduler;
pub mod selection;

pub use controller::{DialogDefaults, DialogHooks, OnChanged, OnPreview, WarnDialogController};
pub use scheduler::{
    DEFAULT_QUIET_INTERVAL, FireCause, PreviewFire, PreviewScheduler, SchedulerConfig,
};
pub use selection::{
    ObserverId, SelectionError, SelectionObserver, SelectionSnapshot, SelectionState,
};
