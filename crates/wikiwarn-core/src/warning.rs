#![forbid(unsafe_code)]

//! Warning template records and their grouping taxonomy.

use crate::level::{LevelSet, WarningLevel};

/// Broad grouping used to organize the template picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    Common,
    ArticleConduct,
    Spam,
    EditorBehavior,
    TagRemoval,
    Other,
    Reminder,
    Policy,
}

impl WarningCategory {
    /// Every category, in picker display order.
    pub const ALL: [WarningCategory; 8] = [
        WarningCategory::Common,
        WarningCategory::ArticleConduct,
        WarningCategory::Spam,
        WarningCategory::EditorBehavior,
        WarningCategory::TagRemoval,
        WarningCategory::Other,
        WarningCategory::Reminder,
        WarningCategory::Policy,
    ];

    /// Heading shown above the category's templates.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Common => "Common warnings",
            Self::ArticleConduct => "Article Conduct Warnings",
            Self::Spam => "Promotions and spam",
            Self::EditorBehavior => "Behavior towards other editors",
            Self::TagRemoval => "Removal of deletion tags",
            Self::Other => "Other",
            Self::Reminder => "Reminders",
            Self::Policy => "Policy Violation Warnings",
        }
    }
}

/// How a template escalates.
///
/// Tiered templates carry the ladder levels they are published at.
/// Single-issue reminders and policy-violation notices have one fixed
/// severity each and no numeric level to choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Escalating series with one template per offered level.
    Tiered {
        /// Ladder levels the series offers. Non-empty in any valid catalog.
        levels: LevelSet,
    },
    /// One-off reminder at the informal end of the scale.
    SingleIssue,
    /// Named policy violation at the final end of the scale.
    PolicyViolation,
}

impl WarningKind {
    /// Levels an operator may select for this kind. Empty for non-tiered
    /// kinds.
    #[must_use]
    pub const fn allowed_levels(self) -> LevelSet {
        match self {
            Self::Tiered { levels } => levels,
            Self::SingleIssue | Self::PolicyViolation => LevelSet::empty(),
        }
    }

    /// Whether this kind offers a level choice at all.
    #[inline]
    #[must_use]
    pub const fn is_tiered(self) -> bool {
        matches!(self, Self::Tiered { .. })
    }

    /// Fixed scale marker for non-tiered kinds: 0 for reminders, 6 for
    /// policy violations. Tiered templates have no single marker.
    #[must_use]
    pub const fn marker_level(self) -> Option<WarningLevel> {
        match self {
            Self::Tiered { .. } => None,
            Self::SingleIssue => Some(WarningLevel::Reminder),
            Self::PolicyViolation => Some(WarningLevel::Policy),
        }
    }
}

/// One warning template from the catalog.
///
/// Immutable once constructed; the catalog hands out `Arc<Warning>` handles
/// so a live selection references the record rather than copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    id: String,
    name: String,
    template: String,
    category: WarningCategory,
    kind: WarningKind,
    note: Option<String>,
}

impl Warning {
    /// Create a template whose on-wiki base name is `uw-` + `id`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: WarningCategory,
        kind: WarningKind,
    ) -> Self {
        let id = id.into();
        let template = format!("uw-{id}");
        Self {
            id,
            name: name.into(),
            template,
            category,
            kind,
            note: None,
        }
    }

    /// Override the on-wiki base name where it differs from `uw-` + id.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Attach a usage note shown beside the template in the picker.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Catalog identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// On-wiki template base name; level suffixing is the renderer's
    /// concern.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Picker grouping.
    #[must_use]
    pub fn category(&self) -> WarningCategory {
        self.category
    }

    /// Escalation kind.
    #[must_use]
    pub fn kind(&self) -> WarningKind {
        self.kind
    }

    /// Usage note, if the template carries one.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Levels an operator may select for this template.
    #[must_use]
    pub fn allowed_levels(&self) -> LevelSet {
        self.kind.allowed_levels()
    }

    /// Whether this template offers a level choice.
    #[must_use]
    pub fn is_tiered(&self) -> bool {
        self.kind.is_tiered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_name_defaults_to_uw_prefix() {
        let warning = Warning::new(
            "vandalism",
            "Vandalism",
            WarningCategory::Common,
            WarningKind::Tiered {
                levels: LevelSet::TIERED_LADDER,
            },
        );
        assert_eq!(warning.template(), "uw-vandalism");
    }

    #[test]
    fn template_override_replaces_default() {
        let warning = Warning::new(
            "cpmove",
            "Cut and paste moves",
            WarningCategory::Reminder,
            WarningKind::SingleIssue,
        )
        .with_template("uw-c&pmove");
        assert_eq!(warning.template(), "uw-c&pmove");
    }

    #[test]
    fn non_tiered_kinds_allow_no_levels() {
        assert!(WarningKind::SingleIssue.allowed_levels().is_empty());
        assert!(WarningKind::PolicyViolation.allowed_levels().is_empty());
    }

    #[test]
    fn markers_match_scale_ends() {
        assert_eq!(
            WarningKind::SingleIssue.marker_level(),
            Some(WarningLevel::Reminder)
        );
        assert_eq!(
            WarningKind::PolicyViolation.marker_level(),
            Some(WarningLevel::Policy)
        );
        let tiered = WarningKind::Tiered {
            levels: LevelSet::TIERED_LADDER,
        };
        assert_eq!(tiered.marker_level(), None);
    }

    #[test]
    fn category_display_names_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for category in WarningCategory::ALL {
            assert!(seen.insert(category.display_name()));
        }
    }
}
