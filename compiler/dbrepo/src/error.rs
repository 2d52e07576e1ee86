//! Structural invariant violations.
//!
//! Lookups that bridge identifier spaces (stamp, name, symbol, scope key)
//! never fail: a miss skips the update. The errors here are the other
//! class: the repository found an entry of the wrong shape in one of its own
//! tables, which means its bookkeeping is broken. Callers treat them as
//! fatal and propagate them.

use std::fmt;

use crate::DebugId;

/// The table an invariant violation was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Types,
    Definitions,
    Locals,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Types => write!(f, "type table"),
            Self::Definitions => write!(f, "definition table"),
            Self::Locals => write!(f, "local table"),
        }
    }
}

/// Error type for repository bookkeeping violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DebugRepoError {
    /// An id resolved to an entry of a different variant than the operation requires.
    #[error("{table} entry {id} is a {found}, expected a {expected}")]
    UnexpectedVariant {
        id: DebugId,
        table: Table,
        expected: &'static str,
        found: &'static str,
    },
    /// An id the repository handed out has no entry in the table it belongs to.
    #[error("{table} has no entry for {id}")]
    UnknownId { id: DebugId, table: Table },
}

/// Create a `DebugRepoError::UnexpectedVariant` error (cold path).
#[cold]
#[inline(never)]
pub(crate) fn unexpected_variant(
    id: DebugId,
    table: Table,
    expected: &'static str,
    found: &'static str,
) -> DebugRepoError {
    tracing::error!(%id, %table, expected, found, "debug repository invariant violated");
    DebugRepoError::UnexpectedVariant {
        id,
        table,
        expected,
        found,
    }
}

/// Create a `DebugRepoError::UnknownId` error (cold path).
#[cold]
#[inline(never)]
pub(crate) fn unknown_id(id: DebugId, table: Table) -> DebugRepoError {
    tracing::error!(%id, %table, "debug repository lost an entry");
    DebugRepoError::UnknownId { id, table }
}
