//! Per-function tree of lexical scopes and the variables declared in them.
//!
//! Scopes are addressed by `(function, frontend scope id)`. The frontend and
//! the symbol binder only know the function's stamp; the code generator only
//! knows its backend symbol. Binding the symbol mirrors every stamp-keyed
//! scope of the function into symbol-keyed space (the "fan-out"), and scopes
//! entered after that are mirrored as they are created.

use std::collections::BTreeMap;

use dbrepo_ir::{Name, ScopeId, SourceLoc, Stamp, SymbolId};
use rustc_hash::FxHashMap;

use crate::error::{unexpected_variant, unknown_id, DebugRepoError, Table};
use crate::id::{DebugId, IdAllocator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub name: Name,
    pub symbol: Option<SymbolId>,
    pub loc: SourceLoc,
    pub ty: DebugId,
    /// Block-scope `static`: lives at a symbol, not in a stack slot.
    pub is_static: bool,
}

/// A lexical block. Children are variables and nested scopes, in
/// attachment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub children: Vec<DebugId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalEntry {
    Variable(LocalVariable),
    Scope(Scope),
}

impl LocalEntry {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Variable(_) => "local variable",
            Self::Scope(_) => "scope",
        }
    }

    pub fn as_variable(&self) -> Option<&LocalVariable> {
        match self {
            Self::Variable(v) => Some(v),
            Self::Scope(_) => None,
        }
    }

    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Self::Scope(s) => Some(s),
            Self::Variable(_) => None,
        }
    }
}

#[derive(Default)]
pub struct LocalTable {
    entries: BTreeMap<DebugId, LocalEntry>,
    vars_by_stamp: FxHashMap<Stamp, DebugId>,
    vars_by_symbol: FxHashMap<SymbolId, DebugId>,
    scopes_by_stamp: FxHashMap<(Stamp, ScopeId), DebugId>,
    scopes_by_symbol: FxHashMap<(SymbolId, ScopeId), DebugId>,
    /// Scope ids entered per function, in entry order; drives the fan-out.
    function_scopes: FxHashMap<Stamp, Vec<ScopeId>>,
    /// Functions whose symbol is already known.
    function_symbols: FxHashMap<Stamp, SymbolId>,
}

impl LocalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.vars_by_stamp.clear();
        self.vars_by_symbol.clear();
        self.scopes_by_stamp.clear();
        self.scopes_by_symbol.clear();
        self.function_scopes.clear();
        self.function_symbols.clear();
    }

    // -- Frontend collection --

    /// Allocate a variable entry keyed by its stamp.
    ///
    /// Declaring the same stamp again returns the existing entry.
    pub fn insert_variable(
        &mut self,
        ids: &mut IdAllocator,
        stamp: Stamp,
        var: LocalVariable,
    ) -> DebugId {
        if let Some(&id) = self.vars_by_stamp.get(&stamp) {
            return id;
        }
        let id = ids.next_id();
        tracing::debug!(%id, %stamp, is_static = var.is_static, "new local variable");
        self.entries.insert(id, LocalEntry::Variable(var));
        self.vars_by_stamp.insert(stamp, id);
        id
    }

    /// Allocate the root scope of a function.
    pub fn enter_function_scope(
        &mut self,
        ids: &mut IdAllocator,
        function: Stamp,
        scope: ScopeId,
    ) -> DebugId {
        self.new_scope(ids, function, scope)
    }

    /// Allocate a scope nested in `parent` and append it to the parent's children.
    ///
    /// Returns `Ok(None)` when the parent scope was never entered. Entering
    /// the same scope again returns its id and leaves the parent unchanged.
    pub fn enter_child_scope(
        &mut self,
        ids: &mut IdAllocator,
        function: Stamp,
        parent: ScopeId,
        scope: ScopeId,
    ) -> Result<Option<DebugId>, DebugRepoError> {
        let Some(&parent_id) = self.scopes_by_stamp.get(&(function, parent)) else {
            tracing::trace!(%function, %parent, %scope, "child of unknown scope ignored");
            return Ok(None);
        };
        // Check the parent before allocating so a violation leaves no orphan.
        self.scope_mut(parent_id)?;
        let id = self.new_scope(ids, function, scope);
        let children = &mut self.scope_mut(parent_id)?.children;
        if !children.contains(&id) {
            children.push(id);
        }
        Ok(Some(id))
    }

    /// Append a variable to a scope's children.
    ///
    /// Returns `Ok(false)` when either the variable or the scope is unknown.
    pub fn attach_variable(
        &mut self,
        function: Stamp,
        variable: Stamp,
        scope: ScopeId,
    ) -> Result<bool, DebugRepoError> {
        let (Some(&var_id), Some(&scope_id)) = (
            self.vars_by_stamp.get(&variable),
            self.scopes_by_stamp.get(&(function, scope)),
        ) else {
            tracing::trace!(%function, %variable, %scope, "attach of unknown variable or scope ignored");
            return Ok(false);
        };
        self.scope_mut(scope_id)?.children.push(var_id);
        Ok(true)
    }

    fn new_scope(&mut self, ids: &mut IdAllocator, function: Stamp, scope: ScopeId) -> DebugId {
        if let Some(&id) = self.scopes_by_stamp.get(&(function, scope)) {
            return id;
        }
        let id = ids.next_id();
        tracing::debug!(%id, %function, %scope, "new scope");
        self.entries.insert(id, LocalEntry::Scope(Scope::default()));
        self.scopes_by_stamp.insert((function, scope), id);
        self.function_scopes.entry(function).or_default().push(scope);
        if let Some(&symbol) = self.function_symbols.get(&function) {
            self.scopes_by_symbol.insert((symbol, scope), id);
        }
        id
    }

    // -- Symbol binding --

    /// Mirror every scope of `function` into symbol-keyed space.
    ///
    /// Scopes entered later are mirrored as they are created. Returns the
    /// number of scopes mirrored now.
    pub fn fan_out(&mut self, function: Stamp, symbol: SymbolId) -> usize {
        self.function_symbols.insert(function, symbol);
        let Some(scopes) = self.function_scopes.get(&function) else {
            return 0;
        };
        for &scope in scopes {
            if let Some(&id) = self.scopes_by_stamp.get(&(function, scope)) {
                self.scopes_by_symbol.insert((symbol, scope), id);
            }
        }
        tracing::debug!(%function, %symbol, scopes = scopes.len(), "scope fan-out");
        scopes.len()
    }

    /// Attach a backend symbol to a local variable.
    pub fn bind_symbol(&mut self, stamp: Stamp, symbol: SymbolId) -> Option<DebugId> {
        let Some(&id) = self.vars_by_stamp.get(&stamp) else {
            tracing::trace!(%stamp, %symbol, "symbol for unknown local ignored");
            return None;
        };
        match self.entries.get_mut(&id) {
            Some(LocalEntry::Variable(var)) => var.symbol = Some(symbol),
            _ => return None,
        }
        self.vars_by_symbol.insert(symbol, id);
        Some(id)
    }

    // -- Lookup --

    pub fn get(&self, id: DebugId) -> Option<&LocalEntry> {
        self.entries.get(&id)
    }

    pub fn id_by_stamp(&self, stamp: Stamp) -> Option<DebugId> {
        self.vars_by_stamp.get(&stamp).copied()
    }

    pub fn id_by_symbol(&self, symbol: SymbolId) -> Option<DebugId> {
        self.vars_by_symbol.get(&symbol).copied()
    }

    pub fn scope_by_stamp(&self, function: Stamp, scope: ScopeId) -> Option<DebugId> {
        self.scopes_by_stamp.get(&(function, scope)).copied()
    }

    pub fn scope_by_symbol(&self, function: SymbolId, scope: ScopeId) -> Option<DebugId> {
        self.scopes_by_symbol.get(&(function, scope)).copied()
    }

    /// All entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (DebugId, &LocalEntry)> {
        self.entries.iter().map(|(&id, entry)| (id, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn scope_mut(&mut self, id: DebugId) -> Result<&mut Scope, DebugRepoError> {
        match self.entries.get_mut(&id) {
            Some(LocalEntry::Scope(s)) => Ok(s),
            Some(other) => Err(unexpected_variant(
                id,
                Table::Locals,
                "scope",
                other.kind_name(),
            )),
            None => Err(unknown_id(id, Table::Locals)),
        }
    }
}
