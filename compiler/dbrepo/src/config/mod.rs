//! Repository configuration.

use std::fmt;

/// How much debug information the unit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugLevel {
    /// Definitions, types, sections and files only. Local variables,
    /// scopes and live ranges are not recorded.
    LineTablesOnly,
    /// Everything, including the local scope tree and live ranges.
    #[default]
    Full,
}

impl DebugLevel {
    /// Whether local variables, scopes and their ranges are recorded.
    #[must_use]
    pub fn tracks_locals(self) -> bool {
        matches!(self, Self::Full)
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineTablesOnly => write!(f, "line-tables"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Equivalence used to deduplicate interned types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeKeyMode {
    /// Types are equal when their normalized spelling is equal.
    ///
    /// Two tags or typedef names that print the same (for example a
    /// `struct node` declared in two different blocks) share one descriptor,
    /// and so do function types differing only in parameter names.
    #[default]
    Spelling,
    /// Types are equal when their attribute-stripped expressions are equal,
    /// frontend stamps of tags and typedef names included.
    Structural,
}

impl fmt::Display for TypeKeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spelling => write!(f, "spelling"),
            Self::Structural => write!(f, "structural"),
        }
    }
}

/// Configuration for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepoConfig {
    pub level: DebugLevel,
    pub type_keys: TypeKeyMode,
}

impl RepoConfig {
    /// Create a configuration with the given level and spelling-based type keys.
    #[must_use]
    pub fn new(level: DebugLevel) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Configuration for units that only need line tables.
    #[must_use]
    pub fn line_tables_only() -> Self {
        Self::new(DebugLevel::LineTablesOnly)
    }

    #[must_use]
    pub fn with_level(mut self, level: DebugLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_type_keys(mut self, type_keys: TypeKeyMode) -> Self {
        self.type_keys = type_keys;
        self
    }
}
