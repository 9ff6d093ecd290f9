#![forbid(unsafe_code)]

//! Level resolution for template switches.
//!
//! When the selected template changes, the previously chosen severity may
//! not exist in the new template's series. [`resolve_level`] decides what
//! the selection becomes, in order:
//!
//! 1. No template selected: no level.
//! 2. Non-tiered template (single-issue or policy-violation): no level.
//!    The marker severity is carried by the template kind, not the
//!    selection.
//! 3. Previous level offered by the new template: keep it.
//! 4. Otherwise, the highest offered level at or below the previous one.
//! 5. Nothing at or below: the lowest offered level.
//!
//! Rule 5 is a fallback inherited from long-standing behavior rather than
//! a stated policy; treat changes to it as UX decisions, not refactors.
//!
//! # Invariants
//!
//! - The result is always offered by the template (`Some` only when the
//!   template is tiered, and then a member of its level set).
//! - Resolving twice with the same template is a no-op: feeding the
//!   result back as `previous` returns it unchanged.
//! - The function reads nothing but its arguments and mutates nothing.

use crate::level::WarningLevel;
use crate::warning::{Warning, WarningKind};

/// Carry a previous severity choice onto a newly selected template.
///
/// Returns the level the selection should hold after switching to
/// `new_warning`, or `None` when no level applies (no template, or a
/// non-tiered one).
#[must_use]
pub fn resolve_level(
    new_warning: Option<&Warning>,
    previous: Option<WarningLevel>,
) -> Option<WarningLevel> {
    let warning = new_warning?;
    let WarningKind::Tiered { levels } = warning.kind() else {
        return None;
    };
    match previous {
        Some(prev) if levels.contains_level(prev) => Some(prev),
        Some(prev) => levels.highest_at_or_below(prev).or_else(|| levels.lowest()),
        None => levels.lowest(),
    }
}
