//! Frontend collection: types, global declarations and the local scope tree.

use dbrepo_ir::{
    CompositeDecl, Declaration, EnumDecl, FunDecl, LocalDecl, ProtoDecl, ScopeId, Stamp,
    StorageClass, TypeExpr, TypedefDecl, VarDecl,
};

use super::DebugRepository;
use crate::defs::{FunctionHeader, GlobalVariable, Parameter};
use crate::error::DebugRepoError;
use crate::id::DebugId;
use crate::locals::LocalVariable;
use crate::types::Field;

impl DebugRepository {
    // -- Global declarations --

    /// Record any file-scope declaration.
    ///
    /// Returns the definition id for variables and functions, and the type
    /// id for composites, enums and typedefs.
    pub fn insert_global_declaration(
        &mut self,
        decl: &Declaration,
    ) -> Result<DebugId, DebugRepoError> {
        match decl {
            Declaration::Variable(var) => self.insert_global_variable(var),
            Declaration::Function(fun) => self.insert_function_definition(fun),
            Declaration::Prototype(proto) => self.insert_prototype(proto),
            Declaration::Composite(comp) => self.define_composite(comp),
            Declaration::Enum(en) => self.define_enum(en),
            Declaration::Typedef(td) => self.define_typedef(td),
        }
    }

    /// Record a file-scope variable.
    ///
    /// `extern` without an initializer is tentative; a later declaration of
    /// the same stamp that has an initializer or another storage class
    /// completes it on the same id.
    pub fn insert_global_variable(&mut self, decl: &VarDecl) -> Result<DebugId, DebugRepoError> {
        self.sections.add_file(decl.loc.file);
        let ty = self.intern_type(&decl.ty);
        let is_extern = decl.storage == StorageClass::Extern;
        let var = GlobalVariable {
            name: decl.name,
            symbol: None,
            loc: decl.loc,
            is_tentative: is_extern && !decl.has_init,
            is_external: decl.storage.is_externally_visible(),
            ty,
        };
        let defining = decl.has_init || !is_extern;
        self.defs
            .declare_variable(&mut self.ids, var, decl.stamp, defining)
    }

    /// Record a function declaration without a body (prototype or implicit
    /// declaration at a call site).
    pub fn insert_prototype(&mut self, decl: &ProtoDecl) -> Result<DebugId, DebugRepoError> {
        self.sections.add_file(decl.loc.file);
        let (ret, is_variadic) = match &decl.ty {
            TypeExpr::Function { ret, variadic, .. } => (self.return_type(ret), *variadic),
            other => (self.return_type(other), false),
        };
        let header = FunctionHeader {
            name: decl.name,
            stamp: decl.stamp,
            storage: decl.storage,
            loc: decl.loc,
            ret,
            is_variadic,
        };
        self.defs.declare_prototype(&mut self.ids, header)
    }

    /// Record a function definition with its parameters.
    pub fn insert_function_definition(
        &mut self,
        decl: &FunDecl,
    ) -> Result<DebugId, DebugRepoError> {
        self.sections.add_file(decl.loc.file);
        let ret = self.return_type(&decl.ret);
        let params = decl
            .params
            .iter()
            .map(|p| Parameter {
                name: p.name,
                stamp: p.stamp,
                symbol: None,
                ty: self.intern_type(&p.ty),
            })
            .collect();
        let header = FunctionHeader {
            name: decl.name,
            stamp: decl.stamp,
            storage: decl.storage,
            loc: decl.loc,
            ret,
            is_variadic: decl.variadic,
        };
        self.defs.define_function(&mut self.ids, header, params)
    }

    fn return_type(&mut self, ret: &TypeExpr) -> Option<DebugId> {
        if ret.is_void() && ret.attrs().is_empty() {
            None
        } else {
            Some(self.intern_type(ret))
        }
    }

    // -- Tagged types --

    /// Record a struct or union.
    ///
    /// The tag's descriptor is created as a forward declaration on first
    /// reference; a declaration with fields patches it in place.
    pub fn define_composite(&mut self, decl: &CompositeDecl) -> Result<DebugId, DebugRepoError> {
        let id = self.intern_type(&TypeExpr::composite(decl.kind, decl.tag, decl.stamp));
        self.attach_file_location_if_unset(id, decl.loc)?;

        if let Some(fields) = &decl.fields {
            let fields = fields
                .iter()
                .map(|f| {
                    let mut field = Field::new(f.name, self.intern_type(&f.ty));
                    field.bit_size = f.bit_width;
                    field
                })
                .collect();
            self.types.set_composite_fields(id, fields)?;
        }
        if let Some(size) = decl.byte_size {
            self.types.set_composite_size(id, size)?;
        }
        Ok(id)
    }

    /// Record an enum definition, patching its forward declaration.
    pub fn define_enum(&mut self, decl: &EnumDecl) -> Result<DebugId, DebugRepoError> {
        let id = self.intern_type(&TypeExpr::enumeration(decl.tag, decl.stamp));
        self.attach_file_location_if_unset(id, decl.loc)?;
        self.types.set_enumerators(id, decl.enumerators.clone())?;
        if let Some(size) = decl.byte_size {
            self.types.set_enum_size(id, size)?;
        }
        Ok(id)
    }

    /// Record a typedef and resolve it to the type it aliases.
    pub fn define_typedef(&mut self, decl: &TypedefDecl) -> Result<DebugId, DebugRepoError> {
        let id = self.intern_type(&TypeExpr::named(decl.name, decl.stamp));
        let target = self.intern_type(&decl.ty);
        self.attach_file_location_if_unset(id, decl.loc)?;
        self.types.resolve_typedef_target(id, target)?;
        Ok(id)
    }

    // -- Locals --

    /// Record a block-scope variable.
    ///
    /// Returns `None` when the unit does not track locals.
    pub fn insert_local_variable(&mut self, decl: &LocalDecl) -> Option<DebugId> {
        self.sections.add_file(decl.loc.file);
        if !self.config.level.tracks_locals() {
            return None;
        }
        let ty = self.intern_type(&decl.ty);
        let var = LocalVariable {
            name: decl.name,
            symbol: None,
            loc: decl.loc,
            ty,
            is_static: decl.storage == StorageClass::Static,
        };
        Some(self.locals.insert_variable(&mut self.ids, decl.stamp, var))
    }

    /// Allocate the root scope of a function and record it on the definition.
    ///
    /// Returns `Ok(None)` when locals are not tracked or the function is unknown.
    pub fn enter_function_scope(
        &mut self,
        function: Stamp,
        scope: ScopeId,
    ) -> Result<Option<DebugId>, DebugRepoError> {
        if !self.config.level.tracks_locals() {
            return Ok(None);
        }
        let Some(fn_id) = self.defs.id_by_stamp(function) else {
            tracing::trace!(%function, %scope, "scope of unknown function ignored");
            return Ok(None);
        };
        // The symbol may already be bound through another stamp of this function.
        if let Some(symbol) = self.defs.function(fn_id)?.symbol {
            self.locals.fan_out(function, symbol);
        }
        let scope_id = self
            .locals
            .enter_function_scope(&mut self.ids, function, scope);
        self.defs.set_root_scope(fn_id, scope_id)?;
        Ok(Some(scope_id))
    }

    /// Allocate a scope nested in `parent`.
    pub fn enter_child_scope(
        &mut self,
        function: Stamp,
        parent: ScopeId,
        scope: ScopeId,
    ) -> Result<Option<DebugId>, DebugRepoError> {
        if !self.config.level.tracks_locals() {
            return Ok(None);
        }
        self.locals
            .enter_child_scope(&mut self.ids, function, parent, scope)
    }

    /// Append a variable to a scope of `function`.
    pub fn attach_variable_to_scope(
        &mut self,
        function: Stamp,
        variable: Stamp,
        scope: ScopeId,
    ) -> Result<bool, DebugRepoError> {
        if !self.config.level.tracks_locals() {
            return Ok(false);
        }
        self.locals.attach_variable(function, variable, scope)
    }
}
