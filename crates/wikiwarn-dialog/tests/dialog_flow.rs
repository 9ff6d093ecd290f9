#![forbid(unsafe_code)]

//! End-to-end dialog sessions against the stock catalog.
//!
//! These walk a realistic patrol flow on a simulated clock: open with
//! defaults, type in bursts, switch templates, watch the level follow,
//! and close the dialog with edits still in flight.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use wikiwarn_core::{Warning, WarningCatalog, WarningLevel};
use wikiwarn_dialog::{
    DialogDefaults, DialogHooks, FireCause, SchedulerConfig, SelectionError, SelectionSnapshot,
    WarnDialogController,
};

/// What a rendered preview would have shown.
#[derive(Debug, Clone, PartialEq)]
struct Rendered {
    template: Option<String>,
    level: Option<WarningLevel>,
    additional_text: Option<String>,
}

impl Rendered {
    fn of(snapshot: &SelectionSnapshot) -> Self {
        Self {
            template: snapshot.warning.as_ref().map(|w| w.template().to_owned()),
            level: snapshot.level,
            additional_text: snapshot.additional_text.clone(),
        }
    }
}

fn recording_hooks() -> (DialogHooks, Rc<RefCell<Vec<Rendered>>>) {
    let previews: Rc<RefCell<Vec<Rendered>>> = Rc::default();
    let sink = Rc::clone(&previews);
    let hooks = DialogHooks::new()
        .on_preview(move |snapshot, _| sink.borrow_mut().push(Rendered::of(snapshot)));
    (hooks, previews)
}

fn stock(catalog: &WarningCatalog, id: &str) -> Arc<Warning> {
    Arc::clone(catalog.get(id).expect("stock catalog entry"))
}

#[test]
fn patrol_session_previews_in_order() {
    let catalog = WarningCatalog::builtin();
    let (hooks, previews) = recording_hooks();
    let base = Instant::now();

    // Revert tooling opens the dialog pointed at vandalism level 2.
    let mut dialog = WarnDialogController::new(
        DialogDefaults::new()
            .with_warning(stock(&catalog, "vandalism"))
            .with_level(WarningLevel::Caution)
            .with_related_page("Example article"),
        SchedulerConfig::default(),
        hooks,
    );
    assert_eq!(dialog.current_level(), Some(WarningLevel::Caution));

    // Initial render.
    dialog.refresh_preview();
    let fire = dialog.tick_at(base).expect("initial preview due");
    assert_eq!(fire.cause, FireCause::Immediate);

    // The user types a note in a burst. No preview until it goes quiet.
    dialog.set_additional_text_at(Some("s".into()), base + Duration::from_millis(500));
    dialog.set_additional_text_at(Some("se".into()), base + Duration::from_millis(700));
    dialog.set_additional_text_at(Some("see talk".into()), base + Duration::from_millis(900));
    assert_eq!(dialog.tick_at(base + Duration::from_millis(2800)), None);
    let fire = dialog
        .tick_at(base + Duration::from_millis(2900))
        .expect("burst went quiet");
    assert_eq!(fire.cause, FireCause::Debounced);
    assert_eq!(fire.coalesced, 3);

    // Escalate to a final warning. Previews immediately.
    dialog
        .set_level(WarningLevel::Final)
        .expect("vandalism offers level 4");
    dialog
        .tick_at(base + Duration::from_millis(3000))
        .expect("structural edit previews at once");

    let rendered = previews.borrow();
    assert_eq!(
        *rendered,
        [
            Rendered {
                template: Some("uw-vandalism".into()),
                level: Some(WarningLevel::Caution),
                additional_text: None,
            },
            Rendered {
                template: Some("uw-vandalism".into()),
                level: Some(WarningLevel::Caution),
                additional_text: Some("see talk".into()),
            },
            Rendered {
                template: Some("uw-vandalism".into()),
                level: Some(WarningLevel::Final),
                additional_text: Some("see talk".into()),
            },
        ]
    );
}

#[test]
fn level_follows_template_switches() {
    let catalog = WarningCatalog::builtin();
    let mut dialog = WarnDialogController::new(
        DialogDefaults::new().with_warning(stock(&catalog, "vandalism")),
        SchedulerConfig::default(),
        DialogHooks::new(),
    );
    assert_eq!(dialog.current_level(), Some(WarningLevel::Notice));

    dialog
        .set_level(WarningLevel::Final)
        .expect("vandalism offers level 4");

    // Editing tests runs 1-3; the final warning degrades to 3.
    dialog.set_warning(Some(stock(&catalog, "test")));
    assert_eq!(dialog.current_level(), Some(WarningLevel::Warning));

    // Template abuse runs 1-2; one step further down.
    dialog.set_warning(Some(stock(&catalog, "tempabuse")));
    assert_eq!(dialog.current_level(), Some(WarningLevel::Caution));

    // The generic series only has level 4, above the current 2.
    dialog.set_warning(Some(stock(&catalog, "generic")));
    assert_eq!(
        dialog.current_level(),
        Some(WarningLevel::Final),
        "a series with nothing below falls back to its floor"
    );

    // A reminder carries no level at all.
    dialog.set_warning(Some(stock(&catalog, "tilde")));
    assert_eq!(dialog.current_level(), None);

    // Back on a tiered series the level restarts at the floor.
    dialog.set_warning(Some(stock(&catalog, "vandalism")));
    assert_eq!(dialog.current_level(), Some(WarningLevel::Notice));
}

#[test]
fn off_series_level_is_rejected_with_the_offer() {
    let catalog = WarningCatalog::builtin();
    let mut dialog = WarnDialogController::new(
        DialogDefaults::new().with_warning(stock(&catalog, "generic")),
        SchedulerConfig::default(),
        DialogHooks::new(),
    );

    let err = dialog
        .set_level(WarningLevel::Notice)
        .expect_err("generic only offers level 4");
    let SelectionError::InvalidLevel { requested, allowed } = err else {
        panic!("unexpected rejection: {err}");
    };
    assert_eq!(requested, WarningLevel::Notice);
    assert_eq!(allowed, stock(&catalog, "generic").allowed_levels());
    assert_eq!(dialog.current_level(), Some(WarningLevel::Final), "unchanged");
}

#[test]
fn dispose_mid_burst_drops_the_trailing_preview() {
    let catalog = WarningCatalog::builtin();
    let (hooks, previews) = recording_hooks();
    let base = Instant::now();

    let mut dialog = WarnDialogController::new(
        DialogDefaults::new().with_warning(stock(&catalog, "vandalism")),
        SchedulerConfig::default(),
        hooks,
    );

    dialog.set_additional_text_at(Some("half-typed".into()), base);
    assert!(dialog.has_pending_preview());

    // The user closes the dialog before the quiet interval elapses.
    dialog.dispose();
    assert_eq!(dialog.tick_at(base + Duration::from_secs(5)), None);
    assert!(previews.borrow().is_empty(), "no preview after dispose");
}
