//! Global variables and functions, reconciled across identifier spaces.
//!
//! A definition is reachable from up to three indices that must agree once
//! fully bound:
//! - frontend stamp (always),
//! - name (functions only; bridges implicit declarations that reach the
//!   table before the defining stamp exists),
//! - backend symbol (once the symbol binder has run).

use std::collections::BTreeMap;

use dbrepo_ir::{Address, Name, SourceLoc, Stamp, StorageClass, SymbolId};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{unexpected_variant, unknown_id, DebugRepoError, Table};
use crate::id::{DebugId, IdAllocator};

/// Low and high pc of a function's emitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcRange {
    pub low: Address,
    pub high: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalVariable {
    pub name: Name,
    pub symbol: Option<SymbolId>,
    pub loc: SourceLoc,
    /// `extern` without initializer, until a defining declaration shows up.
    pub is_tentative: bool,
    pub is_external: bool,
    pub ty: DebugId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Name,
    pub stamp: Stamp,
    pub symbol: Option<SymbolId>,
    pub ty: DebugId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: Name,
    pub symbol: Option<SymbolId>,
    pub loc: SourceLoc,
    pub is_external: bool,
    /// `None` for `void`.
    pub ret: Option<DebugId>,
    pub is_variadic: bool,
    pub params: Vec<Parameter>,
    pub pc_range: Option<PcRange>,
    pub root_scope: Option<DebugId>,
    /// `false` while only a prototype (or implicit declaration) has been seen.
    pub has_body: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    GlobalVariable(GlobalVariable),
    Function(FunctionDef),
}

impl Definition {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::GlobalVariable(_) => "global variable",
            Self::Function(_) => "function",
        }
    }

    pub fn name(&self) -> Name {
        match self {
            Self::GlobalVariable(v) => v.name,
            Self::Function(f) => f.name,
        }
    }

    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            Self::GlobalVariable(v) => v.symbol,
            Self::Function(f) => f.symbol,
        }
    }

    pub fn loc(&self) -> SourceLoc {
        match self {
            Self::GlobalVariable(v) => v.loc,
            Self::Function(f) => f.loc,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDef> {
        match self {
            Self::Function(f) => Some(f),
            Self::GlobalVariable(_) => None,
        }
    }

    pub fn as_variable(&self) -> Option<&GlobalVariable> {
        match self {
            Self::GlobalVariable(v) => Some(v),
            Self::Function(_) => None,
        }
    }
}

/// Function signature pieces shared by prototypes and definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHeader {
    pub name: Name,
    pub stamp: Stamp,
    pub storage: StorageClass,
    pub loc: SourceLoc,
    pub ret: Option<DebugId>,
    pub is_variadic: bool,
}

/// Table of global definitions.
#[derive(Default)]
pub struct DefinitionTable {
    entries: BTreeMap<DebugId, Definition>,
    by_stamp: FxHashMap<Stamp, DebugId>,
    by_name: FxHashMap<Name, DebugId>,
    by_symbol: FxHashMap<SymbolId, DebugId>,
    /// Globals the serializer already emitted.
    printed: FxHashSet<Name>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_stamp.clear();
        self.by_name.clear();
        self.by_symbol.clear();
        self.printed.clear();
    }

    // -- Frontend collection --

    /// Record a file-scope variable declaration.
    ///
    /// The first declaration of a stamp creates the definition; it is
    /// tentative only if it is `extern` without an initializer. Later
    /// declarations can clear the tentative flag but never set it again.
    pub fn declare_variable(
        &mut self,
        ids: &mut IdAllocator,
        var: GlobalVariable,
        stamp: Stamp,
        defining: bool,
    ) -> Result<DebugId, DebugRepoError> {
        let Some(&id) = self.by_stamp.get(&stamp) else {
            let id = ids.next_id();
            tracing::debug!(%id, %stamp, tentative = var.is_tentative, "new global variable");
            self.entries.insert(id, Definition::GlobalVariable(var));
            self.by_stamp.insert(stamp, id);
            return Ok(id);
        };

        let existing = self.variable_mut(id)?;
        if defining && existing.is_tentative {
            existing.is_tentative = false;
            tracing::debug!(%id, %stamp, "tentative definition completed");
        }
        Ok(id)
    }

    /// Record a function declaration without a body.
    ///
    /// If neither the stamp nor the name is known yet, a placeholder is
    /// registered under both, so that a definition arriving later under a
    /// different stamp converges on the same id. Otherwise the existing id is
    /// returned unchanged.
    pub fn declare_prototype(
        &mut self,
        ids: &mut IdAllocator,
        header: FunctionHeader,
    ) -> Result<DebugId, DebugRepoError> {
        if let Some(id) = self.function_id(header.stamp, header.name) {
            self.function(id)?;
            self.by_stamp.entry(header.stamp).or_insert(id);
            return Ok(id);
        }

        let id = ids.next_id();
        tracing::debug!(%id, stamp = %header.stamp, "function placeholder registered by name");
        self.by_stamp.insert(header.stamp, id);
        self.by_name.insert(header.name, id);
        self.entries.insert(
            id,
            Definition::Function(FunctionDef {
                name: header.name,
                symbol: None,
                loc: header.loc,
                is_external: header.storage.is_externally_visible(),
                ret: header.ret,
                is_variadic: header.is_variadic,
                params: Vec::new(),
                pc_range: None,
                root_scope: None,
                has_body: false,
            }),
        );
        Ok(id)
    }

    /// Record a function definition with a body.
    ///
    /// Reuses the id of an earlier prototype or implicit declaration found by
    /// stamp or by name; bindings already made (symbol, pc range, root
    /// scope) survive.
    pub fn define_function(
        &mut self,
        ids: &mut IdAllocator,
        header: FunctionHeader,
        params: Vec<Parameter>,
    ) -> Result<DebugId, DebugRepoError> {
        let existing = self.function_id(header.stamp, header.name);
        let id = match existing {
            Some(id) => id,
            None => ids.next_id(),
        };

        let (symbol, pc_range, root_scope) = match existing {
            Some(id) => {
                let f = self.function(id)?;
                (f.symbol, f.pc_range, f.root_scope)
            }
            None => (None, None, None),
        };

        tracing::debug!(
            %id,
            stamp = %header.stamp,
            reused = existing.is_some(),
            "function definition"
        );
        self.by_stamp.insert(header.stamp, id);
        self.by_name.insert(header.name, id);
        self.entries.insert(
            id,
            Definition::Function(FunctionDef {
                name: header.name,
                symbol,
                loc: header.loc,
                is_external: header.storage.is_externally_visible(),
                ret: header.ret,
                is_variadic: header.is_variadic,
                params,
                pc_range,
                root_scope,
                has_body: true,
            }),
        );
        Ok(id)
    }

    fn function_id(&self, stamp: Stamp, name: Name) -> Option<DebugId> {
        self.by_stamp
            .get(&stamp)
            .or_else(|| self.by_name.get(&name))
            .copied()
    }

    // -- Symbol binding --

    /// Attach a backend symbol to the definition with the given stamp.
    ///
    /// Returns the definition's id, or `None` if the stamp is unknown.
    pub fn bind_symbol(&mut self, stamp: Stamp, symbol: SymbolId) -> Option<DebugId> {
        let Some(&id) = self.by_stamp.get(&stamp) else {
            tracing::trace!(%stamp, %symbol, "symbol for unknown definition ignored");
            return None;
        };
        let entry = self.entries.get_mut(&id)?;
        match entry {
            Definition::GlobalVariable(v) => v.symbol = Some(symbol),
            Definition::Function(f) => f.symbol = Some(symbol),
        }
        self.by_symbol.insert(symbol, id);
        tracing::debug!(%id, %stamp, %symbol, "bound backend symbol");
        Some(id)
    }

    /// Set a function's low/high pc. Last write wins.
    pub fn bind_pc_range(
        &mut self,
        symbol: SymbolId,
        range: PcRange,
    ) -> Result<bool, DebugRepoError> {
        let Some(&id) = self.by_symbol.get(&symbol) else {
            tracing::trace!(%symbol, "pc range for unknown symbol ignored");
            return Ok(false);
        };
        self.function_mut(id)?.pc_range = Some(range);
        Ok(true)
    }

    /// Attach a backend symbol to one parameter of a function.
    pub fn bind_parameter_symbol(
        &mut self,
        function: Stamp,
        param: Stamp,
        symbol: SymbolId,
    ) -> Result<bool, DebugRepoError> {
        let Some(&id) = self.by_stamp.get(&function) else {
            tracing::trace!(%function, %param, "parameter of unknown function ignored");
            return Ok(false);
        };
        let f = self.function_mut(id)?;
        match f.params.iter_mut().find(|p| p.stamp == param) {
            Some(p) => {
                p.symbol = Some(symbol);
                Ok(true)
            }
            None => {
                tracing::trace!(%function, %param, "unknown parameter ignored");
                Ok(false)
            }
        }
    }

    /// Record the root lexical scope of a function.
    pub(crate) fn set_root_scope(
        &mut self,
        id: DebugId,
        scope: DebugId,
    ) -> Result<(), DebugRepoError> {
        self.function_mut(id)?.root_scope = Some(scope);
        Ok(())
    }

    // -- Lookup --

    pub fn get(&self, id: DebugId) -> Option<&Definition> {
        self.entries.get(&id)
    }

    pub fn id_by_stamp(&self, stamp: Stamp) -> Option<DebugId> {
        self.by_stamp.get(&stamp).copied()
    }

    /// Every stamp that resolves to `id`, in ascending order.
    ///
    /// An implicitly declared function and its later definition can reach
    /// one id through different stamps.
    pub fn stamps_of(&self, id: DebugId) -> Vec<Stamp> {
        let mut stamps: Vec<Stamp> = self
            .by_stamp
            .iter()
            .filter_map(|(&stamp, &target)| (target == id).then_some(stamp))
            .collect();
        stamps.sort_unstable();
        stamps
    }

    pub fn id_by_name(&self, name: Name) -> Option<DebugId> {
        self.by_name.get(&name).copied()
    }

    pub fn id_by_symbol(&self, symbol: SymbolId) -> Option<DebugId> {
        self.by_symbol.get(&symbol).copied()
    }

    /// All definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = (DebugId, &Definition)> {
        self.entries.iter().map(|(&id, def)| (id, def))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -- Serializer bookkeeping --

    pub fn mark_printed(&mut self, name: Name) {
        self.printed.insert(name);
    }

    pub fn is_printed(&self, name: Name) -> bool {
        self.printed.contains(&name)
    }

    // -- Variant access --

    /// The function stored under `id`.
    pub(crate) fn function(&self, id: DebugId) -> Result<&FunctionDef, DebugRepoError> {
        match self.entries.get(&id) {
            Some(Definition::Function(f)) => Ok(f),
            Some(other) => Err(unexpected_variant(
                id,
                Table::Definitions,
                "function",
                other.kind_name(),
            )),
            None => Err(unknown_id(id, Table::Definitions)),
        }
    }

    fn function_mut(&mut self, id: DebugId) -> Result<&mut FunctionDef, DebugRepoError> {
        match self.entries.get_mut(&id) {
            Some(Definition::Function(f)) => Ok(f),
            Some(other) => Err(unexpected_variant(
                id,
                Table::Definitions,
                "function",
                other.kind_name(),
            )),
            None => Err(unknown_id(id, Table::Definitions)),
        }
    }

    fn variable_mut(&mut self, id: DebugId) -> Result<&mut GlobalVariable, DebugRepoError> {
        match self.entries.get_mut(&id) {
            Some(Definition::GlobalVariable(v)) => Ok(v),
            Some(other) => Err(unexpected_variant(
                id,
                Table::Definitions,
                "global variable",
                other.kind_name(),
            )),
            None => Err(unknown_id(id, Table::Definitions)),
        }
    }
}
