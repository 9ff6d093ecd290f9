#![forbid(unsafe_code)]

//! Dialog orchestration.
//!
//! [`WarnDialogController`] owns the selection record and the preview
//! scheduler and wires them to the embedder through [`DialogHooks`]. The
//! controller decides nothing about levels itself; resolution lives in
//! [`wikiwarn_core::resolve_level`] and validation in
//! [`SelectionState`]. What it adds is the refresh cadence: structural
//! edits (template, level, manual refresh) request an immediate preview,
//! free-text edits a debounced one. The changed hook runs right away
//! either way.
//!
//! # Lifecycle
//!
//! Construction seeds the selection from [`DialogDefaults`]. The embedder
//! then feeds user edits through the mutators and drives the preview by
//! polling [`tick_at`](WarnDialogController::tick_at), sleeping up to
//! [`time_until_preview`](WarnDialogController::time_until_preview)
//! between polls. [`dispose`](WarnDialogController::dispose) ends the
//! dialog: pending previews are cancelled and hooks and observers are
//! dropped, so every later call is a logged no-op. No callback runs
//! after `dispose` returns.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use wikiwarn_core::{Warning, WarningLevel};

use crate::scheduler::{PreviewFire, PreviewScheduler, SchedulerConfig};
use crate::selection::{
    ObserverId, SelectionError, SelectionSnapshot, SelectionState,
};

/// Selection-changed callback. Runs synchronously inside the mutator.
pub type OnChanged = Box<dyn FnMut(&SelectionSnapshot)>;

/// Preview-refresh callback. Runs inside the tick that grants the fire.
pub type OnPreview = Box<dyn FnMut(&SelectionSnapshot, PreviewFire)>;

/// Embedder callbacks.
///
/// Both hooks are optional; an unset hook is simply skipped.
#[derive(Default)]
pub struct DialogHooks {
    on_changed: Option<OnChanged>,
    on_preview: Option<OnPreview>,
}

impl fmt::Debug for DialogHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogHooks")
            .field("on_changed", &self.on_changed.is_some())
            .field("on_preview", &self.on_preview.is_some())
            .finish()
    }
}

impl DialogHooks {
    /// No callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run after every accepted selection mutation.
    #[must_use]
    pub fn on_changed<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&SelectionSnapshot) + 'static,
    {
        self.on_changed = Some(Box::new(hook));
        self
    }

    /// Run when a preview refresh is granted.
    #[must_use]
    pub fn on_preview<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&SelectionSnapshot, PreviewFire) + 'static,
    {
        self.on_preview = Some(Box::new(hook));
        self
    }

    fn fire_changed(&mut self, snapshot: &SelectionSnapshot) {
        if let Some(hook) = &mut self.on_changed {
            hook(snapshot);
        }
    }

    fn fire_preview(&mut self, snapshot: &SelectionSnapshot, fire: PreviewFire) {
        if let Some(hook) = &mut self.on_preview {
            hook(snapshot, fire);
        }
    }
}

/// Initial selection for a new dialog.
///
/// A preferred level outside the default template's series degrades
/// through level resolution instead of being installed verbatim.
#[derive(Debug, Clone, Default)]
pub struct DialogDefaults {
    /// Template selected when the dialog opens.
    pub warning: Option<Arc<Warning>>,
    /// Preferred severity, typically one above the user's last warning.
    pub level: Option<WarningLevel>,
    /// Page the warning refers to, typically the reverted page.
    pub related_page: Option<String>,
}

impl DialogDefaults {
    /// Empty defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with this template selected.
    #[must_use]
    pub fn with_warning(mut self, warning: Arc<Warning>) -> Self {
        self.warning = Some(warning);
        self
    }

    /// Open preferring this severity.
    #[must_use]
    pub fn with_level(mut self, level: WarningLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Open with the related page filled in.
    #[must_use]
    pub fn with_related_page(mut self, related_page: impl Into<String>) -> Self {
        self.related_page = Some(related_page.into());
        self
    }
}

/// The warn dialog's state machine.
#[derive(Debug)]
pub struct WarnDialogController {
    state: SelectionState,
    scheduler: PreviewScheduler,
    hooks: DialogHooks,
    disposed: bool,
}

impl WarnDialogController {
    /// Open a dialog: seed the selection and attach the hooks.
    ///
    /// Seeding runs no hooks; the embedder renders the initial state
    /// itself, usually via
    /// [`refresh_preview`](Self::refresh_preview).
    #[must_use]
    pub fn new(defaults: DialogDefaults, config: SchedulerConfig, hooks: DialogHooks) -> Self {
        let mut state = SelectionState::new();
        state.seed(defaults.warning, defaults.level, defaults.related_page);
        tracing::debug!(
            target: "wikiwarn.dialog",
            warning = state.warning().map_or("-", |w| w.id()),
            level = ?state.level(),
            "dialog_open"
        );
        Self {
            state,
            scheduler: PreviewScheduler::new(config),
            hooks,
            disposed: false,
        }
    }

    /// Switch the selected template. Immediate preview.
    pub fn set_warning(&mut self, warning: Option<Arc<Warning>>) {
        if self.disposed {
            self.warn_disposed("set_warning");
            return;
        }
        self.state.set_warning(warning);
        self.after_mutation_immediate();
    }

    /// Choose a severity level. Immediate preview.
    ///
    /// # Errors
    ///
    /// Propagates [`SelectionError`] from the selection record; a
    /// rejected level changes nothing and runs no hooks.
    pub fn set_level(&mut self, level: WarningLevel) -> Result<(), SelectionError> {
        if self.disposed {
            self.warn_disposed("set_level");
            return Ok(());
        }
        self.state.set_level(level)?;
        self.after_mutation_immediate();
        Ok(())
    }

    /// Edit the related page. Debounced preview.
    pub fn set_related_page(&mut self, related_page: Option<String>) {
        self.set_related_page_at(related_page, Instant::now());
    }

    /// Clock-explicit form of [`set_related_page`](Self::set_related_page).
    pub fn set_related_page_at(&mut self, related_page: Option<String>, now: Instant) {
        if self.disposed {
            self.warn_disposed("set_related_page");
            return;
        }
        self.state.set_related_page(related_page);
        self.after_mutation_debounced(now);
    }

    /// Edit the free-text addition. Debounced preview.
    pub fn set_additional_text(&mut self, additional_text: Option<String>) {
        self.set_additional_text_at(additional_text, Instant::now());
    }

    /// Clock-explicit form of
    /// [`set_additional_text`](Self::set_additional_text).
    pub fn set_additional_text_at(&mut self, additional_text: Option<String>, now: Instant) {
        if self.disposed {
            self.warn_disposed("set_additional_text");
            return;
        }
        self.state.set_additional_text(additional_text);
        self.after_mutation_debounced(now);
    }

    /// Ask for a preview on the next tick, outside any mutation.
    pub fn refresh_preview(&mut self) {
        if self.disposed {
            self.warn_disposed("refresh_preview");
            return;
        }
        self.scheduler.request_immediate();
    }

    /// Poll for a due preview, running the preview hook on a grant.
    pub fn tick(&mut self) -> Option<PreviewFire> {
        self.tick_at(Instant::now())
    }

    /// Clock-explicit form of [`tick`](Self::tick).
    pub fn tick_at(&mut self, now: Instant) -> Option<PreviewFire> {
        if self.disposed {
            return None;
        }
        let fire = self.scheduler.tick_at(now)?;
        let snapshot = self.state.snapshot();
        self.hooks.fire_preview(&snapshot, fire);
        Some(fire)
    }

    /// How long the event loop may sleep before the next tick.
    #[must_use]
    pub fn time_until_preview(&self, now: Instant) -> Option<Duration> {
        if self.disposed {
            return None;
        }
        self.scheduler.time_until_fire(now)
    }

    /// Whether a preview refresh is scheduled.
    #[must_use]
    pub fn has_pending_preview(&self) -> bool {
        !self.disposed && self.scheduler.has_pending()
    }

    /// Selected template.
    #[must_use]
    pub fn current_warning(&self) -> Option<&Arc<Warning>> {
        self.state.warning()
    }

    /// Chosen severity.
    #[must_use]
    pub fn current_level(&self) -> Option<WarningLevel> {
        self.state.level()
    }

    /// Page the warning refers to.
    #[must_use]
    pub fn current_related_page(&self) -> Option<&str> {
        self.state.related_page()
    }

    /// Free-text addition.
    #[must_use]
    pub fn current_additional_text(&self) -> Option<&str> {
        self.state.additional_text()
    }

    /// Copy the current selection.
    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        self.state.snapshot()
    }

    /// Register a selection observer alongside the hooks.
    ///
    /// Observers registered after [`dispose`](Self::dispose) never run;
    /// disposal has already dropped the mutators' effects.
    pub fn observe_selection<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&SelectionSnapshot) + 'static,
    {
        self.state.observe(observer)
    }

    /// Remove a selection observer. Returns whether it was registered.
    pub fn unobserve_selection(&mut self, id: ObserverId) -> bool {
        self.state.unobserve(id)
    }

    /// Whether the dialog has been closed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Close the dialog. Idempotent.
    ///
    /// Cancels any pending preview and drops hooks and observers. Later
    /// mutator calls become logged no-ops, and once this returns no
    /// callback owned by the dialog runs again.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.scheduler.cancel();
        self.state.clear_observers();
        self.hooks = DialogHooks::new();
        tracing::debug!(target: "wikiwarn.dialog", "dialog_disposed");
    }

    fn after_mutation_immediate(&mut self) {
        let snapshot = self.state.snapshot();
        self.hooks.fire_changed(&snapshot);
        self.scheduler.request_immediate();
    }

    fn after_mutation_debounced(&mut self, now: Instant) {
        let snapshot = self.state.snapshot();
        self.hooks.fire_changed(&snapshot);
        self.scheduler.request_debounced_at(now);
    }

    fn warn_disposed(&self, entry: &'static str) {
        tracing::warn!(target: "wikiwarn.dialog", entry, "call_after_dispose");
    }
}
