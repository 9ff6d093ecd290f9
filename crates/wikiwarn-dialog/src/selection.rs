#![forbid(unsafe_code)]

//! The dialog's selection record.
//!
//! [`SelectionState`] holds what the user has picked so far: the warning
//! template, the severity level, the related page, and the free-text
//! addition. Mutators keep the level consistent with the template through
//! [`resolve_level`] and tell registered observers after every accepted
//! change.
//!
//! # Invariants
//!
//! - With a tiered template selected, the level is a member of its level
//!   set. With a non-tiered template, or none, the level is `None`.
//! - Observers run once per accepted mutation, in registration order,
//!   against a snapshot taken after the change landed.
//! - A rejected [`set_level`](SelectionState::set_level) leaves the state
//!   untouched and the observers unbothered.

use std::fmt;
use std::sync::Arc;

use wikiwarn_core::{LevelSet, Warning, WarningLevel, resolve_level};

/// Observer callback. Boxed and `FnMut`; the dialog is single-threaded.
pub type SelectionObserver = Box<dyn FnMut(&SelectionSnapshot)>;

/// Handle for unregistering an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Rejected selection mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// The requested level is not offered by the selected template.
    InvalidLevel {
        /// What the caller asked for.
        requested: WarningLevel,
        /// What the template offers.
        allowed: LevelSet,
    },
    /// A level was set while no template is selected.
    NoWarningSelected,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel { requested, allowed } => write!(
                f,
                "level {} is not offered by the selected template (allowed: {allowed})",
                requested.index()
            ),
            Self::NoWarningSelected => write!(f, "no warning template is selected"),
        }
    }
}

impl std::error::Error for SelectionError {}

/// Point-in-time copy of the selection, handed to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    /// Selected template, if any.
    pub warning: Option<Arc<Warning>>,
    /// Chosen severity. `Some` only for tiered templates.
    pub level: Option<WarningLevel>,
    /// Page the warning refers to.
    pub related_page: Option<String>,
    /// Free-text addition to the template.
    pub additional_text: Option<String>,
}

/// What the user has picked so far, with change observers.
#[derive(Default)]
pub struct SelectionState {
    warning: Option<Arc<Warning>>,
    level: Option<WarningLevel>,
    related_page: Option<String>,
    additional_text: Option<String>,
    observers: Vec<(ObserverId, SelectionObserver)>,
    next_observer: u64,
}

impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("warning", &self.warning.as_ref().map(|w| w.id()))
            .field("level", &self.level)
            .field("related_page", &self.related_page)
            .field("additional_text", &self.additional_text)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl SelectionState {
    /// Empty selection with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install dialog defaults in one pass, without notifying.
    ///
    /// The preferred level goes through the same resolution as a template
    /// switch, so an out-of-series default degrades instead of sticking.
    pub(crate) fn seed(
        &mut self,
        warning: Option<Arc<Warning>>,
        preferred_level: Option<WarningLevel>,
        related_page: Option<String>,
    ) {
        self.level = resolve_level(warning.as_deref(), preferred_level);
        self.warning = warning;
        self.related_page = related_page;
    }

    /// Switch the selected template, carrying the level across.
    pub fn set_warning(&mut self, warning: Option<Arc<Warning>>) {
        self.level = resolve_level(warning.as_deref(), self.level);
        self.warning = warning;
        self.notify();
    }

    /// Choose a severity level on the selected tiered template.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NoWarningSelected`] without a template, and
    /// [`SelectionError::InvalidLevel`] when the template does not offer
    /// the level. Either way nothing changes and no observer runs.
    pub fn set_level(&mut self, level: WarningLevel) -> Result<(), SelectionError> {
        let Some(warning) = &self.warning else {
            return Err(SelectionError::NoWarningSelected);
        };
        let allowed = warning.allowed_levels();
        if !allowed.contains_level(level) {
            return Err(SelectionError::InvalidLevel {
                requested: level,
                allowed,
            });
        }
        self.level = Some(level);
        self.notify();
        Ok(())
    }

    /// Set or clear the page the warning refers to.
    pub fn set_related_page(&mut self, related_page: Option<String>) {
        self.related_page = related_page;
        self.notify();
    }

    /// Set or clear the free-text addition.
    pub fn set_additional_text(&mut self, additional_text: Option<String>) {
        self.additional_text = additional_text;
        self.notify();
    }

    /// Selected template.
    #[must_use]
    pub fn warning(&self) -> Option<&Arc<Warning>> {
        self.warning.as_ref()
    }

    /// Chosen severity.
    #[must_use]
    pub fn level(&self) -> Option<WarningLevel> {
        self.level
    }

    /// Page the warning refers to.
    #[must_use]
    pub fn related_page(&self) -> Option<&str> {
        self.related_page.as_deref()
    }

    /// Free-text addition.
    #[must_use]
    pub fn additional_text(&self) -> Option<&str> {
        self.additional_text.as_deref()
    }

    /// Copy the current selection.
    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            warning: self.warning.clone(),
            level: self.level,
            related_page: self.related_page.clone(),
            additional_text: self.additional_text.clone(),
        }
    }

    /// Register an observer, called after every accepted mutation.
    pub fn observe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&SelectionSnapshot) + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    /// Drop every observer.
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &mut self.observers {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use wikiwarn_core::{WarningCategory, WarningKind};

    fn tiered(levels: LevelSet) -> Arc<Warning> {
        Arc::new(Warning::new(
            "subject",
            "Subject",
            WarningCategory::Common,
            WarningKind::Tiered { levels },
        ))
    }

    fn reminder() -> Arc<Warning> {
        Arc::new(Warning::new(
            "tilde",
            "Not signing posts",
            WarningCategory::Reminder,
            WarningKind::SingleIssue,
        ))
    }

    fn counting_observer(state: &mut SelectionState) -> Rc<Cell<usize>> {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        state.observe(move |_| seen.set(seen.get() + 1));
        calls
    }

    // --- Level consistency tests ---

    #[test]
    fn selecting_a_tiered_template_picks_its_floor() {
        let mut state = SelectionState::new();
        state.set_warning(Some(tiered(LevelSet::range(
            WarningLevel::Caution,
            WarningLevel::Final,
        ))));
        assert_eq!(state.level(), Some(WarningLevel::Caution));
    }

    #[test]
    fn switching_templates_carries_the_level() {
        let mut state = SelectionState::new();
        state.set_warning(Some(tiered(LevelSet::TIERED_LADDER)));
        state.set_level(WarningLevel::Final).expect("level 4 offered");

        // 4 is missing from a 1-3 series; the scan lands on 3.
        state.set_warning(Some(tiered(LevelSet::range(
            WarningLevel::Notice,
            WarningLevel::Warning,
        ))));
        assert_eq!(state.level(), Some(WarningLevel::Warning));
    }

    #[test]
    fn non_tiered_template_clears_the_level() {
        let mut state = SelectionState::new();
        state.set_warning(Some(tiered(LevelSet::TIERED_LADDER)));
        state.set_level(WarningLevel::Caution).expect("level 2 offered");

        state.set_warning(Some(reminder()));
        assert_eq!(state.level(), None);

        state.set_warning(None);
        assert_eq!(state.level(), None);
    }

    #[test]
    fn rejected_level_leaves_state_unchanged() {
        let mut state = SelectionState::new();
        state.set_warning(Some(tiered(LevelSet::range(
            WarningLevel::Notice,
            WarningLevel::Warning,
        ))));
        let calls = counting_observer(&mut state);

        let err = state
            .set_level(WarningLevel::Immediate)
            .expect_err("level 5 not offered");
        assert_eq!(
            err,
            SelectionError::InvalidLevel {
                requested: WarningLevel::Immediate,
                allowed: LevelSet::range(WarningLevel::Notice, WarningLevel::Warning),
            }
        );
        assert_eq!(state.level(), Some(WarningLevel::Notice), "level kept");
        assert_eq!(calls.get(), 0, "rejection must not notify");
    }

    #[test]
    fn level_without_template_is_rejected() {
        let mut state = SelectionState::new();
        assert_eq!(
            state.set_level(WarningLevel::Notice),
            Err(SelectionError::NoWarningSelected)
        );
    }

    #[test]
    fn error_messages_name_the_offer() {
        let err = SelectionError::InvalidLevel {
            requested: WarningLevel::Immediate,
            allowed: LevelSet::range(WarningLevel::Notice, WarningLevel::Warning),
        };
        assert_eq!(
            err.to_string(),
            "level 5 is not offered by the selected template (allowed: 1, 2, 3)"
        );
    }

    // --- Observer tests ---

    #[test]
    fn each_mutation_notifies_once() {
        let mut state = SelectionState::new();
        let calls = counting_observer(&mut state);

        state.set_warning(Some(tiered(LevelSet::TIERED_LADDER)));
        assert_eq!(calls.get(), 1);

        state.set_level(WarningLevel::Warning).expect("level 3 offered");
        assert_eq!(calls.get(), 2);

        state.set_related_page(Some("Example".into()));
        assert_eq!(calls.get(), 3);

        state.set_additional_text(Some("see talk".into()));
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn observers_see_the_post_change_snapshot() {
        let mut state = SelectionState::new();
        let seen: Rc<Cell<Option<WarningLevel>>> = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        state.observe(move |snapshot| sink.set(snapshot.level));

        state.set_warning(Some(tiered(LevelSet::TIERED_LADDER)));
        state.set_level(WarningLevel::Final).expect("level 4 offered");
        assert_eq!(seen.get(), Some(WarningLevel::Final));
    }

    #[test]
    fn observers_run_in_registration_order() {
        let mut state = SelectionState::new();
        let order: Rc<std::cell::RefCell<Vec<u8>>> = Rc::default();

        let first = Rc::clone(&order);
        state.observe(move |_| first.borrow_mut().push(1));
        let second = Rc::clone(&order);
        state.observe(move |_| second.borrow_mut().push(2));

        state.set_related_page(Some("Example".into()));
        assert_eq!(*order.borrow(), [1, 2]);
    }

    #[test]
    fn unobserve_stops_calls() {
        let mut state = SelectionState::new();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let id = state.observe(move |_| seen.set(seen.get() + 1));

        state.set_related_page(Some("Example".into()));
        assert!(state.unobserve(id));
        state.set_related_page(None);

        assert_eq!(calls.get(), 1);
        assert!(!state.unobserve(id), "second removal finds nothing");
    }

    #[test]
    fn clear_observers_silences_everyone() {
        let mut state = SelectionState::new();
        let calls = counting_observer(&mut state);
        state.clear_observers();
        state.set_related_page(Some("Example".into()));
        assert_eq!(calls.get(), 0);
    }

    // --- Seeding tests ---

    #[test]
    fn seed_resolves_the_preferred_level() {
        let mut state = SelectionState::new();
        let calls = counting_observer(&mut state);

        state.seed(
            Some(tiered(LevelSet::range(
                WarningLevel::Notice,
                WarningLevel::Warning,
            ))),
            Some(WarningLevel::Immediate),
            Some("Example".into()),
        );

        assert_eq!(state.level(), Some(WarningLevel::Warning));
        assert_eq!(state.related_page(), Some("Example"));
        assert_eq!(calls.get(), 0, "seeding is silent");
    }

    #[test]
    fn seed_without_template_holds_nothing() {
        let mut state = SelectionState::new();
        state.seed(None, Some(WarningLevel::Warning), None);
        assert_eq!(state.warning(), None);
        assert_eq!(state.level(), None);
    }

    #[test]
    fn snapshot_matches_accessors() {
        let mut state = SelectionState::new();
        state.set_warning(Some(tiered(LevelSet::TIERED_LADDER)));
        state.set_additional_text(Some("see talk".into()));

        let snapshot = state.snapshot();
        assert_eq!(
            snapshot.warning.as_ref().map(|w| w.id()),
            state.warning().map(|w| w.id())
        );
        assert_eq!(snapshot.level, state.level());
        assert_eq!(snapshot.related_page.as_deref(), state.related_page());
        assert_eq!(snapshot.additional_text.as_deref(), state.additional_text());
    }
}
