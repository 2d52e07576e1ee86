//! Live-range and scope-boundary tracking during code emission.
//!
//! The code generator reports ordered address events for one function at a
//! time. Every scope and every variable keeps a list of ranges; an event
//! either pushes a new open range or terminates the most recent one.
//!
//! Scope ranges are stored most recent first, the order the serializer
//! emits them in; variable ranges are stored oldest first and read through
//! [`VarLocation::latest_first`]. Either way "the most recent range" is the
//! top of a stack. Closing the top assumes well-nested emission: scopes close
//! in the reverse order they opened.

use std::collections::BTreeMap;

use dbrepo_ir::{Address, LocationDesc};

use crate::id::DebugId;

/// An address interval over which a variable lives at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveRange {
    pub start: Option<Address>,
    pub end: Option<Address>,
    pub location: LocationDesc,
}

/// An address interval over which a scope is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeRange {
    pub start: Option<Address>,
    pub end: Option<Address>,
}

/// Storage history of one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarLocation {
    /// Storage changes over the variable's lifetime. Oldest first.
    Ranges(Vec<LiveRange>),
    /// One unconditional slot for the whole lifetime.
    Fixed {
        frame_offset: i64,
        location: LocationDesc,
    },
}

impl VarLocation {
    /// Live ranges, most recent first. Empty for a fixed location.
    pub fn latest_first(&self) -> impl Iterator<Item = &LiveRange> {
        let ranges: &[LiveRange] = match self {
            Self::Ranges(ranges) => ranges,
            Self::Fixed { .. } => &[],
        };
        ranges.iter().rev()
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }
}

/// Range state of the unit plus the open sets of the function being emitted.
#[derive(Default)]
pub struct RangeTracker {
    var_locations: BTreeMap<DebugId, VarLocation>,
    scope_ranges: BTreeMap<DebugId, Vec<ScopeRange>>,
    open_scopes: Vec<DebugId>,
    open_vars: Vec<DebugId>,
}

impl RangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.var_locations.clear();
        self.scope_ranges.clear();
        self.open_scopes.clear();
        self.open_vars.clear();
    }

    // -- Scopes --

    /// Open a new range for `scope` at `at`.
    ///
    /// A range of `scope` still open at that point ends where the new one
    /// begins, so a scope never holds more than one open range.
    pub fn open_scope(&mut self, scope: DebugId, at: Address) {
        let ranges = self.scope_ranges.entry(scope).or_default();
        if let Some(head) = ranges.first_mut().filter(|head| head.end.is_none()) {
            head.end = Some(at);
        }
        ranges.insert(
            0,
            ScopeRange {
                start: Some(at),
                end: None,
            },
        );
        if !self.open_scopes.contains(&scope) {
            self.open_scopes.push(scope);
        }
    }

    /// Terminate the most recent range of `scope` at `at`.
    ///
    /// A scope whose most recent range is already terminated is left alone.
    pub fn close_scope(&mut self, scope: DebugId, at: Address) {
        if let Some(head) = self
            .scope_ranges
            .get_mut(&scope)
            .and_then(|ranges| ranges.first_mut())
        {
            if head.end.is_none() {
                head.end = Some(at);
            }
        }
        self.open_scopes.retain(|&s| s != scope);
    }

    // -- Variables --

    /// Open a new live range for `var` at `location`.
    ///
    /// A variable lives at one location at a time: a range still open when
    /// the next one starts ends where the next one begins. Ignored for
    /// variables that already have a fixed location.
    pub fn start_live_range(&mut self, var: DebugId, at: Address, location: LocationDesc) {
        let entry = self
            .var_locations
            .entry(var)
            .or_insert_with(|| VarLocation::Ranges(Vec::new()));
        let VarLocation::Ranges(ranges) = entry else {
            tracing::trace!(%var, "live range for fixed-location variable ignored");
            return;
        };
        if let Some(head) = ranges.last_mut().filter(|head| head.end.is_none()) {
            head.end = Some(at);
        }
        ranges.push(LiveRange {
            start: Some(at),
            end: None,
            location,
        });
        if !self.open_vars.contains(&var) {
            self.open_vars.push(var);
        }
    }

    /// Terminate the most recent live range of `var`, if it is still open.
    pub fn end_live_range(&mut self, var: DebugId, at: Address) {
        if let Some(VarLocation::Ranges(ranges)) = self.var_locations.get_mut(&var) {
            if let Some(head) = ranges.last_mut() {
                if head.end.is_none() {
                    head.end = Some(at);
                }
            }
        }
        self.open_vars.retain(|&v| v != var);
    }

    /// Give `var` one unconditional slot, replacing any range history.
    pub fn stack_variable(&mut self, var: DebugId, frame_offset: i64, location: LocationDesc) {
        self.var_locations.insert(
            var,
            VarLocation::Fixed {
                frame_offset,
                location,
            },
        );
        self.open_vars.retain(|&v| v != var);
    }

    // -- Function boundary --

    /// Close every scope and variable range still open at `at`, then reset
    /// the open sets.
    pub fn function_end(&mut self, at: Address) {
        let scopes = std::mem::take(&mut self.open_scopes);
        let vars = std::mem::take(&mut self.open_vars);
        tracing::debug!(
            open_scopes = scopes.len(),
            open_vars = vars.len(),
            %at,
            "function end"
        );
        for scope in scopes.into_iter().rev() {
            self.close_scope(scope, at);
        }
        for var in vars {
            self.end_live_range(var, at);
        }
    }

    // -- Lookup --

    pub fn var_location(&self, var: DebugId) -> Option<&VarLocation> {
        self.var_locations.get(&var)
    }

    /// Ranges of `scope`, most recent first.
    pub fn scope_ranges(&self, scope: DebugId) -> &[ScopeRange] {
        self.scope_ranges
            .get(&scope)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn var_locations(&self) -> impl Iterator<Item = (DebugId, &VarLocation)> {
        self.var_locations.iter().map(|(&id, loc)| (id, loc))
    }

    /// Every scope's ranges, in id order; each list most recent first.
    pub fn scope_range_table(&self) -> impl Iterator<Item = (DebugId, &[ScopeRange])> {
        self.scope_ranges
            .iter()
            .map(|(&id, ranges)| (id, ranges.as_slice()))
    }

    pub fn has_open_entries(&self) -> bool {
        !self.open_scopes.is_empty() || !self.open_vars.is_empty()
    }
}
