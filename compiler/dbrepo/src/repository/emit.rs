//! Code-emission events, output sections and label resolution.
//!
//! The code generator only knows backend symbols. Every event resolves its
//! symbol (and scope id) to a `DebugId` first; an unresolved event is
//! dropped.

use dbrepo_ir::{Address, LocationDesc, Name, ScopeId, SymbolId};

use super::DebugRepository;
use crate::id::DebugId;
use crate::sections::FileNumber;

impl DebugRepository {
    // -- Scope boundaries --

    /// Open a new range of a scope of `function` at `at`.
    pub fn open_scope(&mut self, function: SymbolId, scope: ScopeId, at: Address) {
        if let Some(id) = self.emitted_scope(function, scope) {
            self.ranges.open_scope(id, at);
        }
    }

    /// Terminate the most recent range of a scope of `function` at `at`.
    pub fn close_scope(&mut self, function: SymbolId, scope: ScopeId, at: Address) {
        if let Some(id) = self.emitted_scope(function, scope) {
            self.ranges.close_scope(id, at);
        }
    }

    fn emitted_scope(&self, function: SymbolId, scope: ScopeId) -> Option<DebugId> {
        if !self.config.level.tracks_locals() {
            return None;
        }
        let id = self.locals.scope_by_symbol(function, scope);
        if id.is_none() {
            tracing::trace!(%function, %scope, "event for unknown scope ignored");
        }
        id
    }

    // -- Variable locations --

    /// Start a live range of the local bound to `var` at `location`.
    pub fn start_live_range(&mut self, var: SymbolId, at: Address, location: LocationDesc) {
        if let Some(id) = self.emitted_var(var) {
            self.ranges.start_live_range(id, at, location);
        }
    }

    /// End the current live range of the local bound to `var`.
    pub fn end_live_range(&mut self, var: SymbolId, at: Address) {
        if let Some(id) = self.emitted_var(var) {
            self.ranges.end_live_range(id, at);
        }
    }

    /// Give the local bound to `var` one fixed slot for its whole lifetime.
    pub fn stack_variable(&mut self, var: SymbolId, frame_offset: i64, location: LocationDesc) {
        if let Some(id) = self.emitted_var(var) {
            self.ranges.stack_variable(id, frame_offset, location);
        }
    }

    fn emitted_var(&self, var: SymbolId) -> Option<DebugId> {
        if !self.config.level.tracks_locals() {
            return None;
        }
        let id = self.locals.id_by_symbol(var);
        if id.is_none() {
            tracing::trace!(%var, "event for unknown local ignored");
        }
        id
    }

    /// Close every scope and live range `function` left open, at `at`.
    pub fn function_end(&mut self, function: SymbolId, at: Address) {
        tracing::trace!(%function, %at, "function end");
        self.ranges.function_end(at);
    }

    // -- Sections and files --

    pub fn add_compilation_section_start(&mut self, section: Name, start: Address) {
        self.sections.add_section_start(section, start);
    }

    pub fn add_compilation_section_end(&mut self, section: Name, end: Address) {
        self.sections.add_section_end(section, end);
    }

    pub fn section_exists(&self, section: Name) -> bool {
        self.sections.exists(section)
    }

    /// Finalize sections and number every `(section, file)` pair.
    ///
    /// See [`crate::sections::SectionTable::compute_file_enum`].
    pub fn compute_file_enum(
        &mut self,
        end_label: impl FnMut(Name) -> Address,
        entry_label: impl FnMut(Name, Name) -> FileNumber,
        on_close: impl FnMut(Name),
    ) {
        self.sections
            .compute_file_enum(end_label, entry_label, on_close);
    }

    /// Visit every referenced file, independent of sections.
    pub fn for_each_file(&self, f: impl FnMut(Name)) {
        self.sections.for_each_file(f);
    }

    // -- Labels --

    pub fn add_label(&mut self, function: SymbolId, position: u32, address: Address) {
        self.labels.add_label(function, position, address);
    }

    pub fn translate_label(&self, function: SymbolId, position: u32) -> Option<Address> {
        self.labels.translate_label(function, position)
    }
}
