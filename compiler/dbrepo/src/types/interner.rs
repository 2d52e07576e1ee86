//! The type table: hash-consing plus in-place patching.

use std::collections::BTreeMap;

use dbrepo_ir::{Attr, Enumerator, Name, SourceLoc, TypeExpr};
use rustc_hash::FxHashMap;
use smallvec::smallvec;

use super::canon::{strip_attributes, TypeKey};
use super::{ArrayDims, CompositeType, EnumType, Field, FunctionType, TypeDescriptor, TypedefType};
use crate::config::TypeKeyMode;
use crate::error::{unexpected_variant, unknown_id, DebugRepoError, Table};
use crate::id::{DebugId, IdAllocator};
use crate::stack::ensure_sufficient_stack;

/// Layout of a bitfield member, as computed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitfieldLayout {
    pub bit_size: u32,
    pub bit_offset: u32,
    pub byte_offset: u64,
    pub byte_size: u64,
    /// Name of the integer type the bitfield is carved out of.
    pub base: Name,
}

/// Hash-consed table of type descriptors.
///
/// Descriptors are keyed by the canonical form of the type expression that
/// produced them (see [`TypeKeyMode`]). Ids come from the repository-wide
/// [`IdAllocator`], so they interleave with definition and local ids.
pub struct TypeInterner {
    mode: TypeKeyMode,
    descriptors: BTreeMap<DebugId, TypeDescriptor>,
    keys: FxHashMap<TypeKey, DebugId>,
}

impl TypeInterner {
    pub fn new(mode: TypeKeyMode) -> Self {
        Self {
            mode,
            descriptors: BTreeMap::new(),
            keys: FxHashMap::default(),
        }
    }

    pub fn mode(&self) -> TypeKeyMode {
        self.mode
    }

    /// Forget every descriptor; the key mode is kept.
    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.keys.clear();
    }

    /// Intern a type expression, returning the id of its canonical descriptor.
    ///
    /// Non-qualifier attributes are stripped first, so `int *restrict` and
    /// `int *` share an id. Interning the same canonical type twice returns
    /// the same id.
    pub fn intern(&mut self, ids: &mut IdAllocator, ty: &TypeExpr) -> DebugId {
        let canonical = strip_attributes(ty);
        self.intern_canonical(ids, &canonical)
    }

    fn intern_canonical(&mut self, ids: &mut IdAllocator, ty: &TypeExpr) -> DebugId {
        ensure_sufficient_stack(|| {
            let key = TypeKey::of(self.mode, ty);
            if let Some(&id) = self.keys.get(&key) {
                return id;
            }

            // Children first: their ids are allocated before the parent's.
            let descriptor = self.build(ids, ty);
            let id = ids.next_id();
            tracing::debug!(%id, kind = descriptor.kind_name(), "interned type");
            self.descriptors.insert(id, descriptor);
            self.keys.insert(key, id);
            id
        })
    }

    fn build(&mut self, ids: &mut IdAllocator, ty: &TypeExpr) -> TypeDescriptor {
        // Qualifier peeling: the outermost const/volatile wraps whatever the
        // rest of the chain interns to. Anything else at that position is
        // skipped without consuming an id.
        let attrs = ty.attrs();
        if let Some(pos) = attrs.iter().position(|a| a.is_cv()) {
            let qualifier = attrs[pos];
            let mut rest = ty.clone();
            rest.attrs_mut().drain(..=pos);
            let inner = self.intern_canonical(ids, &rest);
            return match qualifier {
                Attr::Const => TypeDescriptor::Const { inner },
                _ => TypeDescriptor::Volatile { inner },
            };
        }

        match ty {
            TypeExpr::Void { .. } => TypeDescriptor::Void,
            TypeExpr::Int { kind, .. } => TypeDescriptor::Integer(*kind),
            TypeExpr::Float { kind, .. } => TypeDescriptor::Float(*kind),
            TypeExpr::Pointer { pointee, .. } => TypeDescriptor::Pointer {
                pointee: self.intern_canonical(ids, pointee),
            },
            TypeExpr::Array { elem, len, .. } => {
                // `T[a][b]` folds into one descriptor with dims [a, b] as long
                // as the inner arrays are unqualified.
                let mut dims: ArrayDims = smallvec![*len];
                let mut element: &TypeExpr = elem;
                while let TypeExpr::Array { elem, len, attrs } = element {
                    if !attrs.is_empty() {
                        break;
                    }
                    dims.push(*len);
                    element = &**elem;
                }
                TypeDescriptor::Array {
                    element: self.intern_canonical(ids, element),
                    dims,
                }
            }
            TypeExpr::Function { ret, params, .. } => {
                let ret = if ret.is_void() && ret.attrs().is_empty() {
                    None
                } else {
                    Some(self.intern_canonical(ids, ret))
                };
                let prototyped = params.is_some();
                let params = params
                    .iter()
                    .flatten()
                    .map(|(name, ty)| (*name, self.intern_canonical(ids, ty)))
                    .collect();
                TypeDescriptor::Function(FunctionType {
                    ret,
                    prototyped,
                    params,
                })
            }
            TypeExpr::Named { name, .. } => TypeDescriptor::Typedef(TypedefType {
                name: *name,
                loc: None,
                target: None,
            }),
            TypeExpr::Composite { kind, tag, .. } => {
                TypeDescriptor::Composite(CompositeType::forward(*kind, *tag))
            }
            TypeExpr::Enum { tag, .. } => TypeDescriptor::Enum(EnumType::forward(*tag)),
        }
    }

    // -- Lookup --

    pub fn get(&self, id: DebugId) -> Option<&TypeDescriptor> {
        self.descriptors.get(&id)
    }

    /// Id of an already-interned type expression, without interning it.
    pub fn lookup(&self, ty: &TypeExpr) -> Option<DebugId> {
        let canonical = strip_attributes(ty);
        self.keys
            .get(&TypeKey::of(self.mode, &canonical))
            .copied()
    }

    /// All descriptors in id order.
    pub fn iter(&self) -> impl Iterator<Item = (DebugId, &TypeDescriptor)> {
        self.descriptors.iter().map(|(&id, ty)| (id, ty))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    // -- In-place updates --
    //
    // Each update computes the patched descriptor and writes it back only if
    // it differs from the current one. The returned flag reports whether a
    // write happened.

    /// Set the byte size of a struct or union.
    pub fn set_composite_size(&mut self, id: DebugId, size: u64) -> Result<bool, DebugRepoError> {
        self.patch_composite(id, |c| c.byte_size = Some(size))
    }

    /// Replace the members of a struct or union and mark it defined.
    pub fn set_composite_fields(
        &mut self,
        id: DebugId,
        fields: Vec<Field>,
    ) -> Result<bool, DebugRepoError> {
        self.patch_composite(id, |c| {
            c.fields = fields;
            c.is_defined = true;
        })
    }

    /// Set the byte offset of a named member. Unknown members are ignored.
    pub fn set_member_byte_offset(
        &mut self,
        id: DebugId,
        member: Name,
        offset: u64,
    ) -> Result<bool, DebugRepoError> {
        self.patch_composite(id, |c| {
            if let Some(field) = c.fields.iter_mut().find(|f| f.name == member) {
                field.byte_offset = Some(offset);
            }
        })
    }

    /// Record the bitfield layout of a named member. Unknown members are ignored.
    pub fn set_bitfield_layout(
        &mut self,
        id: DebugId,
        member: Name,
        layout: BitfieldLayout,
    ) -> Result<bool, DebugRepoError> {
        self.patch_composite(id, |c| {
            if let Some(field) = c.fields.iter_mut().find(|f| f.name == member) {
                field.bit_size = Some(layout.bit_size);
                field.bit_offset = Some(layout.bit_offset);
                field.byte_offset = Some(layout.byte_offset);
                field.byte_size = Some(layout.byte_size);
                field.bitfield_base = Some(layout.base);
            }
        })
    }

    /// Replace the enumerators of an enum.
    pub fn set_enumerators(
        &mut self,
        id: DebugId,
        enumerators: Vec<Enumerator>,
    ) -> Result<bool, DebugRepoError> {
        self.patch(id, "enum", |ty| match ty {
            TypeDescriptor::Enum(e) => {
                e.enumerators = enumerators;
                true
            }
            _ => false,
        })
    }

    /// Set the byte size of an enum.
    pub fn set_enum_size(&mut self, id: DebugId, size: u64) -> Result<bool, DebugRepoError> {
        self.patch(id, "enum", |ty| match ty {
            TypeDescriptor::Enum(e) => {
                e.byte_size = Some(size);
                true
            }
            _ => false,
        })
    }

    /// Point a typedef at the type it aliases.
    pub fn resolve_typedef_target(
        &mut self,
        id: DebugId,
        target: DebugId,
    ) -> Result<bool, DebugRepoError> {
        self.patch(id, "typedef", |ty| match ty {
            TypeDescriptor::Typedef(t) => {
                t.target = Some(target);
                true
            }
            _ => false,
        })
    }

    /// Attach a source location to a composite, enum or typedef that has none yet.
    pub fn attach_file_location_if_unset(
        &mut self,
        id: DebugId,
        loc: SourceLoc,
    ) -> Result<bool, DebugRepoError> {
        self.patch(id, "composite, enum or typedef", |ty| {
            let slot = match ty {
                TypeDescriptor::Composite(c) => &mut c.loc,
                TypeDescriptor::Enum(e) => &mut e.loc,
                TypeDescriptor::Typedef(t) => &mut t.loc,
                _ => return false,
            };
            if slot.is_none() {
                *slot = Some(loc);
            }
            true
        })
    }

    fn patch_composite(
        &mut self,
        id: DebugId,
        f: impl FnOnce(&mut CompositeType),
    ) -> Result<bool, DebugRepoError> {
        self.patch(id, "composite", |ty| match ty {
            TypeDescriptor::Composite(c) => {
                f(c);
                true
            }
            _ => false,
        })
    }

    /// Apply `f` to a copy of the descriptor and write it back if it changed.
    ///
    /// `f` returns `false` when the descriptor is not of the variant it
    /// operates on, which is reported as an invariant violation.
    fn patch(
        &mut self,
        id: DebugId,
        expected: &'static str,
        f: impl FnOnce(&mut TypeDescriptor) -> bool,
    ) -> Result<bool, DebugRepoError> {
        let current = self
            .descriptors
            .get(&id)
            .ok_or_else(|| unknown_id(id, Table::Types))?;

        let mut patched = current.clone();
        if !f(&mut patched) {
            return Err(unexpected_variant(
                id,
                Table::Types,
                expected,
                current.kind_name(),
            ));
        }
        if patched == *current {
            return Ok(false);
        }

        tracing::debug!(%id, kind = patched.kind_name(), "patched type in place");
        self.descriptors.insert(id, patched);
        Ok(true)
    }
}
