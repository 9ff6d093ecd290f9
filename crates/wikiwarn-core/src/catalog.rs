#![forbid(unsafe_code)]

//! Warning template catalog: the builtin table and definition-file loading.
//!
//! The catalog is an insertion-ordered table keyed by template identifier.
//! Iteration order is load order, which the picker presents directly, so a
//! definition file controls its own listing order.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | malformed JSON | [`CatalogError::Parse`] |
//! | repeated identifier | [`CatalogError::DuplicateId`] |
//! | tiered entry without `levels` | [`CatalogError::MissingLevels`] |
//! | non-tiered entry with `levels` | [`CatalogError::UnexpectedLevels`] |
//! | tiered entry with empty `levels` | [`CatalogError::EmptyLevels`] |
//! | level outside the 1–5 ladder | [`CatalogError::InvalidLevelIndex`] |

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::level::{LevelSet, WarningLevel};
use crate::warning::{Warning, WarningCategory, WarningKind};

/// Errors from loading a catalog definition document.
#[derive(Debug)]
pub enum CatalogError {
    /// The document is not valid JSON or does not match the schema.
    Parse(serde_json::Error),
    /// Two entries share an identifier.
    DuplicateId(String),
    /// A tiered entry has no `levels` array.
    MissingLevels {
        /// Offending entry.
        id: String,
    },
    /// A non-tiered entry carries a `levels` array.
    UnexpectedLevels {
        /// Offending entry.
        id: String,
    },
    /// A tiered entry's `levels` array is empty.
    EmptyLevels {
        /// Offending entry.
        id: String,
    },
    /// A listed level is outside the tiered ladder (1 through 5).
    InvalidLevelIndex {
        /// Offending entry.
        id: String,
        /// The out-of-range value.
        index: u8,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "catalog parse error: {e}"),
            Self::DuplicateId(id) => write!(f, "duplicate warning identifier: {id}"),
            Self::MissingLevels { id } => {
                write!(f, "tiered warning {id} lists no levels")
            }
            Self::UnexpectedLevels { id } => {
                write!(f, "non-tiered warning {id} lists levels")
            }
            Self::EmptyLevels { id } => {
                write!(f, "tiered warning {id} has an empty level list")
            }
            Self::InvalidLevelIndex { id, index } => {
                write!(
                    f,
                    "warning {id} lists level {index}, outside the tiered ladder"
                )
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

// ── Definition-file schema ───────────────────────────────────────────────
//
// Private wire types; converted into domain types with validation so the
// rest of the crate never sees a partially-checked entry.

#[derive(Debug, Deserialize)]
struct CatalogFile {
    warnings: Vec<WarningEntry>,
}

#[derive(Debug, Deserialize)]
struct WarningEntry {
    id: String,
    name: String,
    category: CategoryName,
    kind: KindName,
    #[serde(default)]
    levels: Option<Vec<u8>>,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum CategoryName {
    Common,
    ArticleConduct,
    Spam,
    EditorBehavior,
    TagRemoval,
    Other,
    Reminder,
    Policy,
}

impl From<CategoryName> for WarningCategory {
    fn from(name: CategoryName) -> Self {
        match name {
            CategoryName::Common => Self::Common,
            CategoryName::ArticleConduct => Self::ArticleConduct,
            CategoryName::Spam => Self::Spam,
            CategoryName::EditorBehavior => Self::EditorBehavior,
            CategoryName::TagRemoval => Self::TagRemoval,
            CategoryName::Other => Self::Other,
            CategoryName::Reminder => Self::Reminder,
            CategoryName::Policy => Self::Policy,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum KindName {
    Tiered,
    SingleIssue,
    PolicyViolation,
}

impl WarningEntry {
    fn into_warning(self) -> Result<Warning, CatalogError> {
        let WarningEntry {
            id,
            name,
            category,
            kind,
            levels,
            template,
            note,
        } = self;

        let kind = match kind {
            KindName::Tiered => {
                let Some(indices) = levels else {
                    return Err(CatalogError::MissingLevels { id });
                };
                if indices.is_empty() {
                    return Err(CatalogError::EmptyLevels { id });
                }
                let mut set = LevelSet::empty();
                for index in indices {
                    let level = WarningLevel::from_index(index).filter(|l| l.is_tiered());
                    let Some(level) = level else {
                        return Err(CatalogError::InvalidLevelIndex { id, index });
                    };
                    set |= LevelSet::only(level);
                }
                WarningKind::Tiered { levels: set }
            }
            KindName::SingleIssue | KindName::PolicyViolation => {
                if levels.is_some() {
                    return Err(CatalogError::UnexpectedLevels { id });
                }
                match kind {
                    KindName::SingleIssue => WarningKind::SingleIssue,
                    _ => WarningKind::PolicyViolation,
                }
            }
        };

        let mut warning = Warning::new(id, name, category.into(), kind);
        if let Some(template) = template {
            warning = warning.with_template(template);
        }
        if let Some(note) = note {
            warning = warning.with_note(note);
        }
        Ok(warning)
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────

/// Identifier-keyed, insertion-ordered table of warning templates.
#[derive(Debug, Clone, Default)]
pub struct WarningCatalog {
    entries: IndexMap<String, Arc<Warning>>,
}

impl WarningCatalog {
    /// Catalog with no templates.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON definition document.
    ///
    /// The document shape is
    /// `{"warnings": [{"id", "name", "category", "kind", "levels"?,
    /// "template"?, "note"?}, ...]}` with kebab-case category and kind
    /// names and numeric ladder positions in `levels`. Listed levels are
    /// treated as a set; repeats collapse.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::empty();
        for entry in file.warnings {
            let warning = entry.into_warning()?;
            if catalog.entries.contains_key(warning.id()) {
                return Err(CatalogError::DuplicateId(warning.id().to_owned()));
            }
            catalog.insert(warning);
        }
        Ok(catalog)
    }

    /// Add a template. Replaces and returns any entry with the same
    /// identifier, keeping the original's position.
    pub fn insert(&mut self, warning: Warning) -> Option<Arc<Warning>> {
        let id = warning.id().to_owned();
        self.entries.insert(id, Arc::new(warning))
    }

    /// Look up a template by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Warning>> {
        self.entries.get(id)
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Templates in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Warning>> {
        self.entries.values()
    }

    /// Templates of one category, in load order.
    pub fn by_category(&self, category: WarningCategory) -> impl Iterator<Item = &Arc<Warning>> {
        self.entries
            .values()
            .filter(move |warning| warning.category() == category)
    }

    /// The stock English Wikipedia template table.
    #[must_use]
    pub fn builtin() -> Self {
        use WarningCategory::{ArticleConduct, Common, EditorBehavior, Other, Spam, TagRemoval};
        use WarningLevel::{Caution, Final, Immediate, Notice};

        let mut c = Self::empty();

        // Common warnings
        c.insert(tiered("vandalism", "Vandalism", Common, Notice, Immediate));
        c.insert(tiered("disruptive", "Disruptive editing", Common, Notice, Final));
        c.insert(tiered("test", "Editing tests", Common, Notice, WarningLevel::Warning));
        c.insert(tiered("delete", "Removal of content, blanking", Common, Notice, Immediate));
        c.insert(Warning::new(
            "generic",
            "Generic warning (for template series missing level 4)",
            Common,
            WarningKind::Tiered {
                levels: LevelSet::only(Final),
            },
        ));

        // Article conduct warnings
        c.insert(tiered(
            "biog",
            "Adding unreferenced information about living persons",
            ArticleConduct,
            Notice,
            Immediate,
        ));
        c.insert(tiered(
            "error",
            "Introducing deliberate factual errors",
            ArticleConduct,
            Notice,
            Final,
        ));
        c.insert(tiered(
            "genre",
            "Frequent or mass changes to genres without consensus or reference",
            ArticleConduct,
            Notice,
            Final,
        ));
        c.insert(tiered("image", "Image-related vandalism", ArticleConduct, Notice, Immediate));
        c.insert(tiered("joke", "Using improper humor", ArticleConduct, Notice, Immediate));
        c.insert(tiered(
            "nor",
            "Adding original research, including unpublished syntheses of sources",
            ArticleConduct,
            Notice,
            Final,
        ));
        c.insert(tiered(
            "notcensored",
            "Censorship of material",
            ArticleConduct,
            Notice,
            WarningLevel::Warning,
        ));
        c.insert(tiered("own", "Ownership of articles", ArticleConduct, Notice, Immediate));
        c.insert(tiered(
            "tdel",
            "Removal of maintenance templates",
            ArticleConduct,
            Notice,
            Final,
        ));
        c.insert(tiered(
            "unsourced",
            "Addition of unsourced or improperly cited material",
            ArticleConduct,
            Notice,
            Final,
        ));

        // Promotions and spam
        c.insert(tiered(
            "advert",
            "Using Wikipedia for advertising or promotion",
            Spam,
            Notice,
            Immediate,
        ));
        c.insert(tiered(
            "npov",
            "Not adhering to neutral point of view",
            Spam,
            Notice,
            Final,
        ));
        c.insert(tiered(
            "paid",
            "Paid editing without disclosure under the Wikimedia Terms of Use",
            Spam,
            Notice,
            Final,
        ));
        c.insert(tiered("spam", "Adding spam links", Spam, Notice, Immediate));

        // Behavior towards other editors
        c.insert(tiered(
            "agf",
            "Not assuming good faith",
            EditorBehavior,
            Notice,
            WarningLevel::Warning,
        ));
        c.insert(tiered("harass", "Harassment of other users", EditorBehavior, Notice, Immediate));
        c.insert(tiered(
            "npa",
            "Personal attack directed at a specific editor",
            EditorBehavior,
            Notice,
            Immediate,
        ));
        c.insert(tiered(
            "tempabuse",
            "Improper use of warning or blocking template",
            EditorBehavior,
            Notice,
            Caution,
        ));

        // Removal of deletion tags
        c.insert(tiered("afd", "Removing {{afd}} templates", TagRemoval, Notice, Final));
        c.insert(tiered("blpprod", "Removing {{blp prod}} templates", TagRemoval, Notice, Final));
        c.insert(tiered("idt", "Removing file deletion tags", TagRemoval, Notice, Final));
        c.insert(tiered("speedy", "Removing speedy deletion tags", TagRemoval, Notice, Final));

        // Other
        c.insert(tiered("attempt", "Triggering the edit filter", Other, Notice, Final));
        c.insert(tiered("chat", "Using talk page as forum", Other, Notice, Final));
        c.insert(tiered("create", "Creating inappropriate pages", Other, Notice, Immediate));
        c.insert(tiered("mos", "Manual of style", Other, Notice, Final));
        c.insert(tiered(
            "move",
            "Page moves against naming conventions or consensus",
            Other,
            Notice,
            Immediate,
        ));
        c.insert(tiered(
            "tpv",
            "Refactoring others' talk page comments",
            Other,
            Notice,
            Immediate,
        ));
        c.insert(tiered("upload", "Uploading unencyclopedic images", Other, Notice, Immediate));

        // Reminders
        c.insert(reminder("aiv", "Bad AIV report"));
        c.insert(reminder("autobiography", "Creating autobiographies"));
        c.insert(reminder("badcat", "Adding incorrect categories"));
        c.insert(reminder("badlistentry", "Adding inappropriate entries to lists"));
        c.insert(reminder("bite", "Being harsh to newcomers"));
        c.insert(reminder("coi", "Conflict of interest"));
        c.insert(reminder("controversial", "Introducing controversial material"));
        c.insert(reminder("copying", "Copying text to another page"));
        c.insert(reminder("crystal", "Adding speculative or unconfirmed information"));
        c.insert(reminder("cpmove", "Cut and paste moves").with_template("uw-c&pmove"));
        c.insert(reminder("dab", "Incorrect edit to a disambiguation page"));
        c.insert(reminder("date", "Unnecessarily changing date formats"));
        c.insert(reminder("deadlink", "Removing proper sources containing dead links"));
        c.insert(reminder("draftfirst", "User should draft in draftspace or userspace"));
        c.insert(reminder("editsummary", "Not using edit comment"));
        c.insert(reminder("elinbody", "Adding external links to the body of an article"));
        c.insert(reminder("english", "Not communicating in English"));
        c.insert(reminder("hasty", "Hasty addition of speedy deletion tags"));
        c.insert(reminder(
            "italicize",
            "Italicize books, films, albums, magazines, TV series, etc within articles",
        ));
        c.insert(reminder(
            "lang",
            "Unnecessarily changing between British and American English",
        ));
        c.insert(reminder(
            "linking",
            "Excessive addition of redlinks or repeated blue links",
        ));
        c.insert(reminder("minor", "Incorrect use of minor edits check box"));
        c.insert(reminder("notenglish", "Creating non-English articles"));
        c.insert(reminder("notvote", "We use consensus, not voting"));
        c.insert(reminder(
            "plagiarism",
            "Copying from public domain sources without attribution",
        ));
        c.insert(reminder("preview", "Use preview button to avoid mistakes"));
        c.insert(reminder("redlink", "Indiscriminate removal of redlinks"));
        c.insert(reminder("selfrevert", "Reverting self tests"));
        c.insert(reminder("socialnetwork", "Wikipedia is not a social network"));
        c.insert(reminder("sofixit", "Be bold and fix things yourself"));
        c.insert(reminder(
            "spoiler",
            "Adding spoiler alerts or removing spoilers from appropriate sections",
        ));
        c.insert(reminder("talkinarticle", "Talk in article"));
        c.insert(reminder("tilde", "Not signing posts"));
        c.insert(reminder("toppost", "Posting at the top of talk pages"));
        c.insert(
            reminder("userspaceDraftFinish", "Stale userspace draft")
                .with_template("uw-userspace draft finish"),
        );
        c.insert(reminder(
            "vgscope",
            "Adding video game walkthroughs, cheats or instructions",
        ));
        c.insert(reminder(
            "warn",
            "Place user warning templates when reverting vandalism",
        ));
        c.insert(reminder(
            "wrongsummary",
            "Using inaccurate or inappropriate edit summaries",
        ));

        // Policy violation warnings
        c.insert(policy("3rr", "Potential three-revert rule violation; see also uw-ew"));
        c.insert(policy("affiliate", "Affiliate marketing"));
        c.insert(
            policy("agfsock", "Use of multiple accounts (assuming good faith)")
                .with_template("uw-agf-sock"),
        );
        c.insert(policy("attack", "Creating attack pages"));
        c.insert(policy("botun", "Bot username").with_note(USERNAME_NOTE));
        c.insert(policy("canvass", "Canvassing"));
        c.insert(policy("copyright", "Copyright violation"));
        c.insert(
            policy("copyrightlink", "Linking to copyrighted works violation")
                .with_template("uw-copyright-link"),
        );
        c.insert(
            policy(
                "copyrightnew",
                "Copyright violation (with explanation for new users)",
            )
            .with_template("uw-copyright-new"),
        );
        c.insert(
            policy("copyrightremove", "Removing {{copyvio}} template from articles")
                .with_template("uw-copyright-remove"),
        );
        c.insert(policy("efsummary", "Edit comment triggering the edit filter"));
        c.insert(policy("ew", "Edit warring (stronger wording)"));
        c.insert(policy("ewsoft", "Edit warring (softer wording for newcomers)"));
        c.insert(policy("hijacking", "Hijacking articles"));
        c.insert(policy("hoax", "Creating hoaxes"));
        c.insert(policy("legal", "Making legal threats"));
        c.insert(policy("login", "Editing while logged out"));
        c.insert(policy("multipleIPs", "Usage of multiple IPs"));
        c.insert(policy("pinfo", "Personal info"));
        c.insert(policy("salt", "Recreating salted articles under a different title"));
        c.insert(policy("socksuspect", "Sockpuppetry"));
        c.insert(policy("upv", "Userpage vandalism"));
        c.insert(policy("username", "Username is against policy").with_note(USERNAME_NOTE));
        c.insert(
            policy("coiusername", "Username is against policy, and conflict of interest")
                .with_template("uw-coi-username")
                .with_note(USERNAME_NOTE),
        );
        c.insert(
            policy("userpage", "Userpage or subpage is against policy").with_note(USERNAME_NOTE),
        );

        c
    }
}

const USERNAME_NOTE: &str = "Username notices should not be added for blatant violations. \
    In these cases, click the gavel to report the username to the admins.";

fn tiered(
    id: &str,
    name: &str,
    category: WarningCategory,
    lo: WarningLevel,
    hi: WarningLevel,
) -> Warning {
    Warning::new(
        id,
        name,
        category,
        WarningKind::Tiered {
            levels: LevelSet::range(lo, hi),
        },
    )
}

fn reminder(id: &str, name: &str) -> Warning {
    Warning::new(id, name, WarningCategory::Reminder, WarningKind::SingleIssue)
}

fn policy(id: &str, name: &str) -> Warning {
    Warning::new(id, name, WarningCategory::Policy, WarningKind::PolicyViolation)
}
