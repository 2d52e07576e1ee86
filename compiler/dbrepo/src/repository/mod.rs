//! The repository facade: one value owning every table of a unit.
//!
//! Methods are grouped by the pass that calls them:
//! - `declare.rs`: frontend type and declaration collection
//! - `bind.rs`: backend symbol binding
//! - `emit.rs`: code-emission events, sections and labels
//!
//! Read access for the serializer lives here.

mod bind;
mod declare;
mod emit;

use dbrepo_ir::{Enumerator, Name, ScopeId, SourceLoc, Stamp, SymbolId, TypeExpr};

use crate::config::RepoConfig;
use crate::defs::{Definition, DefinitionTable};
use crate::error::DebugRepoError;
use crate::id::{DebugId, IdAllocator};
use crate::labels::LabelTable;
use crate::locals::{LocalEntry, LocalTable};
use crate::ranges::{RangeTracker, ScopeRange, VarLocation};
use crate::sections::{CompilationSection, FileNumber, SectionTable};
use crate::types::{BitfieldLayout, TypeDescriptor, TypeInterner};

/// Debug information accumulated for one compilation unit.
///
/// Populated by the frontend, then the symbol binder, then the code
/// generator, in that order; read by the serializer afterwards. Call
/// [`DebugRepository::init`] before reusing it for the next unit.
pub struct DebugRepository {
    config: RepoConfig,
    unit_name: String,
    ids: IdAllocator,
    types: TypeInterner,
    defs: DefinitionTable,
    locals: LocalTable,
    ranges: RangeTracker,
    sections: SectionTable,
    labels: LabelTable,
}

impl DebugRepository {
    pub fn new(config: RepoConfig) -> Self {
        Self {
            config,
            unit_name: String::new(),
            ids: IdAllocator::new(),
            types: TypeInterner::new(config.type_keys),
            defs: DefinitionTable::new(),
            locals: LocalTable::new(),
            ranges: RangeTracker::new(),
            sections: SectionTable::new(),
            labels: LabelTable::new(),
        }
    }

    /// Start a new compilation unit: reset the id counter and clear every table.
    pub fn init(&mut self, unit_name: &str) {
        tracing::debug!(
            unit = unit_name,
            level = %self.config.level,
            type_keys = %self.config.type_keys,
            previous_ids = self.ids.allocated(),
            "debug repository init"
        );
        unit_name.clone_into(&mut self.unit_name);
        self.ids.reset();
        self.types.clear();
        self.defs.clear();
        self.locals.clear();
        self.ranges.clear();
        self.sections.clear();
        self.labels.clear();
    }

    pub fn config(&self) -> RepoConfig {
        self.config
    }

    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    /// Allocate a fresh id from the shared counter.
    pub fn next_id(&mut self) -> DebugId {
        self.ids.next_id()
    }

    // -- Types --

    /// Intern a type expression (see [`TypeInterner::intern`]).
    pub fn intern_type(&mut self, ty: &TypeExpr) -> DebugId {
        self.types.intern(&mut self.ids, ty)
    }

    /// Attach a source location to a composite, enum or typedef that has none yet.
    pub fn attach_file_location_if_unset(
        &mut self,
        id: DebugId,
        loc: SourceLoc,
    ) -> Result<bool, DebugRepoError> {
        self.sections.add_file(loc.file);
        self.types.attach_file_location_if_unset(id, loc)
    }

    /// Set the byte size of a struct or union.
    pub fn set_composite_size(&mut self, id: DebugId, size: u64) -> Result<bool, DebugRepoError> {
        self.types.set_composite_size(id, size)
    }

    /// Set the byte offset of a named member. Unknown members are ignored.
    pub fn set_member_byte_offset(
        &mut self,
        id: DebugId,
        member: Name,
        offset: u64,
    ) -> Result<bool, DebugRepoError> {
        self.types.set_member_byte_offset(id, member, offset)
    }

    pub fn set_bitfield_layout(
        &mut self,
        id: DebugId,
        member: Name,
        layout: BitfieldLayout,
    ) -> Result<bool, DebugRepoError> {
        self.types.set_bitfield_layout(id, member, layout)
    }

    pub fn set_enumerators(
        &mut self,
        id: DebugId,
        enumerators: Vec<Enumerator>,
    ) -> Result<bool, DebugRepoError> {
        self.types.set_enumerators(id, enumerators)
    }

    /// Point a typedef at the type it aliases.
    pub fn resolve_typedef_target(
        &mut self,
        id: DebugId,
        target: DebugId,
    ) -> Result<bool, DebugRepoError> {
        self.types.resolve_typedef_target(id, target)
    }

    pub fn type_descriptor(&self, id: DebugId) -> Option<&TypeDescriptor> {
        self.types.get(id)
    }

    /// Every type descriptor, in id order.
    pub fn types(&self) -> impl Iterator<Item = (DebugId, &TypeDescriptor)> {
        self.types.iter()
    }

    // -- Definitions --

    pub fn definition(&self, id: DebugId) -> Option<&Definition> {
        self.defs.get(id)
    }

    pub fn definition_by_stamp(&self, stamp: Stamp) -> Option<DebugId> {
        self.defs.id_by_stamp(stamp)
    }

    pub fn definition_by_name(&self, name: Name) -> Option<DebugId> {
        self.defs.id_by_name(name)
    }

    pub fn definition_by_symbol(&self, symbol: SymbolId) -> Option<DebugId> {
        self.defs.id_by_symbol(symbol)
    }

    /// Every definition, in id order.
    pub fn definitions(&self) -> impl Iterator<Item = (DebugId, &Definition)> {
        self.defs.iter()
    }

    pub fn mark_variable_printed(&mut self, name: Name) {
        self.defs.mark_printed(name);
    }

    pub fn is_variable_printed(&self, name: Name) -> bool {
        self.defs.is_printed(name)
    }

    // -- Locals --

    pub fn local(&self, id: DebugId) -> Option<&LocalEntry> {
        self.locals.get(id)
    }

    pub fn local_by_stamp(&self, stamp: Stamp) -> Option<DebugId> {
        self.locals.id_by_stamp(stamp)
    }

    pub fn scope_by_stamp(&self, function: Stamp, scope: ScopeId) -> Option<DebugId> {
        self.locals.scope_by_stamp(function, scope)
    }

    pub fn scope_by_symbol(&self, function: SymbolId, scope: ScopeId) -> Option<DebugId> {
        self.locals.scope_by_symbol(function, scope)
    }

    /// Every local entry (variables and scopes), in id order.
    pub fn locals(&self) -> impl Iterator<Item = (DebugId, &LocalEntry)> {
        self.locals.iter()
    }

    // -- Ranges --

    pub fn var_location(&self, var: DebugId) -> Option<&VarLocation> {
        self.ranges.var_location(var)
    }

    /// Ranges of a scope, most recent first.
    pub fn scope_ranges(&self, scope: DebugId) -> &[ScopeRange] {
        self.ranges.scope_ranges(scope)
    }

    pub fn var_locations(&self) -> impl Iterator<Item = (DebugId, &VarLocation)> {
        self.ranges.var_locations()
    }

    pub fn scope_range_table(&self) -> impl Iterator<Item = (DebugId, &[ScopeRange])> {
        self.ranges.scope_range_table()
    }

    // -- Sections and files --

    pub fn section(&self, name: Name) -> Option<&CompilationSection> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &CompilationSection> {
        self.sections.iter()
    }

    /// Every file referenced by a source location of the unit.
    pub fn files(&self) -> impl Iterator<Item = Name> + '_ {
        self.sections.files()
    }

    pub fn file_number(&self, section: Name, file: Name) -> Option<FileNumber> {
        self.sections.file_number(section, file)
    }
}

impl Default for DebugRepository {
    fn default() -> Self {
        Self::new(RepoConfig::default())
    }
}

#[cfg(test)]
mod tests;
