#![forbid(unsafe_code)]

//! Escalation levels and level sets for user-conduct warnings.
//!
//! The scale runs 0 through 6. Levels 1 through 5 form the tiered ladder
//! used by escalating template series; 0 and 6 are standalone markers
//! carried by reminder and policy-violation templates, which never
//! escalate.
//!
//! # Invariants
//!
//! - Bit order in [`LevelSet`] matches severity order, so iteration is
//!   always lowest-to-highest.
//! - [`LevelSet::highest_at_or_below`] never returns a level above its cap.

use std::fmt;

use bitflags::bitflags;

/// Severity marker on the warning escalation scale.
///
/// `Reminder` and `Policy` bracket the tiered ladder: they are fixed
/// severities carried by non-tiered templates, not steps an operator can
/// escalate through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum WarningLevel {
    /// Informal reminder; the marker carried by single-issue notices.
    Reminder = 0,
    /// Level 1: assumes good faith.
    Notice = 1,
    /// Level 2: no assumption of faith.
    Caution = 2,
    /// Level 3: assumes bad faith.
    Warning = 3,
    /// Level 4: last warning.
    Final = 4,
    /// Level 4im: first and only warning.
    Immediate = 5,
    /// Policy-violation marker carried by single-severity policy notices.
    Policy = 6,
}

impl WarningLevel {
    /// Every level, lowest to highest.
    pub const ALL: [WarningLevel; 7] = [
        WarningLevel::Reminder,
        WarningLevel::Notice,
        WarningLevel::Caution,
        WarningLevel::Warning,
        WarningLevel::Final,
        WarningLevel::Immediate,
        WarningLevel::Policy,
    ];

    /// The tiered ladder proper, levels 1 through 5.
    pub const TIERED: [WarningLevel; 5] = [
        WarningLevel::Notice,
        WarningLevel::Caution,
        WarningLevel::Warning,
        WarningLevel::Final,
        WarningLevel::Immediate,
    ];

    /// Numeric position on the 0–6 scale.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Level at a numeric position, if it is on the scale.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Reminder),
            1 => Some(Self::Notice),
            2 => Some(Self::Caution),
            3 => Some(Self::Warning),
            4 => Some(Self::Final),
            5 => Some(Self::Immediate),
            6 => Some(Self::Policy),
            _ => None,
        }
    }

    /// Whether this level sits on the tiered ladder (1 through 5).
    #[inline]
    #[must_use]
    pub const fn is_tiered(self) -> bool {
        !matches!(self, Self::Reminder | Self::Policy)
    }

    /// Short label shown beside a level selector.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Notice => "notice",
            Self::Caution => "caution",
            Self::Warning => "warning",
            Self::Final => "final warning",
            Self::Immediate => "only warning",
            Self::Policy => "policy violation",
        }
    }

    /// One-line description of the stance this level takes.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Reminder => "Informal reminder carrying no warning.",
            Self::Notice => "Assumes good faith.",
            Self::Caution => "Makes no assumption of faith.",
            Self::Warning => "Assumes bad faith; asks to cease and desist.",
            Self::Final => "Assumes bad faith; the last warning before a report.",
            Self::Immediate => "Assumes bad faith; the first and only warning.",
            Self::Policy => "Names a policy violation with a single fixed severity.",
        }
    }
}

bitflags! {
    /// Set of escalation levels a warning template may be issued at.
    ///
    /// One bit per scale position, so severity order and bit order agree.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LevelSet: u8 {
        const REMINDER  = 1 << 0;
        const NOTICE    = 1 << 1;
        const CAUTION   = 1 << 2;
        const WARNING   = 1 << 3;
        const FINAL     = 1 << 4;
        const IMMEDIATE = 1 << 5;
        const POLICY    = 1 << 6;
    }
}

impl LevelSet {
    /// The full tiered ladder, levels 1 through 5.
    pub const TIERED_LADDER: LevelSet = Self::NOTICE
        .union(Self::CAUTION)
        .union(Self::WARNING)
        .union(Self::FINAL)
        .union(Self::IMMEDIATE);

    /// Set containing exactly `level`.
    #[must_use]
    pub const fn only(level: WarningLevel) -> Self {
        Self::from_bits_truncate(1 << level.index())
    }

    /// Contiguous run of levels from `lo` through `hi`, inclusive.
    ///
    /// An inverted pair yields the empty set.
    #[must_use]
    pub const fn range(lo: WarningLevel, hi: WarningLevel) -> Self {
        let mut bits = 0u8;
        let mut index = lo.index();
        while index <= hi.index() {
            bits |= 1 << index;
            index += 1;
        }
        Self::from_bits_truncate(bits)
    }

    /// Build a set from an unordered slice of levels.
    #[must_use]
    pub fn from_levels(levels: &[WarningLevel]) -> Self {
        levels
            .iter()
            .fold(Self::empty(), |set, level| set | Self::only(*level))
    }

    /// Whether `level` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains_level(self, level: WarningLevel) -> bool {
        self.bits() & (1 << level.index()) != 0
    }

    /// Number of levels in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Lowest level in the set, if any.
    #[must_use]
    pub fn lowest(self) -> Option<WarningLevel> {
        WarningLevel::from_index(self.bits().trailing_zeros() as u8)
    }

    /// Highest level in the set, if any.
    #[must_use]
    pub fn highest(self) -> Option<WarningLevel> {
        if self.is_empty() {
            return None;
        }
        WarningLevel::from_index(7 - self.bits().leading_zeros() as u8)
    }

    /// Highest set level at or below `cap`, if any.
    ///
    /// This is the downward-scan primitive used when a previously chosen
    /// level is not offered by a newly selected template.
    #[must_use]
    pub fn highest_at_or_below(self, cap: WarningLevel) -> Option<WarningLevel> {
        self.intersection(Self::range(WarningLevel::Reminder, cap))
            .highest()
    }

    /// Iterate the set's levels, lowest to highest.
    pub fn levels(self) -> impl Iterator<Item = WarningLevel> {
        WarningLevel::ALL
            .into_iter()
            .filter(move |level| self.contains_level(*level))
    }
}

impl fmt::Display for LevelSet {
    /// Comma-joined numeric positions: `1, 2, 3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for level in self.levels() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", level.index())?;
            first = false;
        }
        Ok(())
    }
}
