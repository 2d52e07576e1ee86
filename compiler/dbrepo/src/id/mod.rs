//! Repository-wide debug ids.
//!
//! One counter feeds the type, definition and local tables, so a
//! [`DebugId`] is unique across their union. Ids are never reused within a
//! compilation unit; [`IdAllocator::reset`] starts the next unit at zero.

use std::fmt;

/// Opaque identifier of a type descriptor, definition or local entry.
///
/// Once allocated, an id never changes meaning; only the payload it
/// addresses may be patched in place.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct DebugId(u32);

impl DebugId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DebugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DebugId({})", self.0)
    }
}

impl fmt::Display for DebugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id counter shared by every table of one repository.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a fresh id and advance the counter.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` ids are requested for one unit.
    #[inline]
    pub fn next_id(&mut self) -> DebugId {
        let id = DebugId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .unwrap_or_else(|| panic!("debug id counter overflowed"));
        id
    }

    /// Number of ids handed out since the last reset.
    #[inline]
    pub fn allocated(&self) -> u32 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
