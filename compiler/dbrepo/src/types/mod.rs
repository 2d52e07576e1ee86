//! Type descriptors and the hash-consing type interner.
//!
//! Every distinct (canonical) type of the unit is stored once and referenced
//! by its [`DebugId`]. Children are referenced by id as well, so the table is
//! a graph, not a tree.
//!
//! # Forward declarations
//!
//! Referencing `struct S`, `union U`, `enum E` or a typedef name creates a
//! placeholder descriptor keyed by the tag alone. The definition that follows
//! patches that same descriptor in place, so every id captured earlier
//! observes the completed type.
//!
//! # Qualifiers
//!
//! `const` and `volatile` each become one wrapper node per occurrence.
//! All other attributes (`restrict`, alignment, vendor attributes) are
//! discarded before keying, so they never produce a node.

mod canon;
mod interner;

use dbrepo_ir::{CompositeKind, Enumerator, FloatKind, IntKind, Name, SourceLoc};
use smallvec::SmallVec;

use crate::DebugId;

pub use interner::{BitfieldLayout, TypeInterner};

/// A member of a struct or union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Name,
    pub ty: DebugId,
    pub bit_size: Option<u32>,
    pub bit_offset: Option<u32>,
    pub byte_offset: Option<u64>,
    pub byte_size: Option<u64>,
    /// Name of the integer type a bitfield is carved out of.
    pub bitfield_base: Option<Name>,
}

impl Field {
    /// A field with no layout information yet.
    pub fn new(name: Name, ty: DebugId) -> Self {
        Self {
            name,
            ty,
            bit_size: None,
            bit_offset: None,
            byte_offset: None,
            byte_size: None,
            bitfield_base: None,
        }
    }
}

/// A struct or union, possibly still a forward declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeType {
    pub kind: CompositeKind,
    pub tag: Name,
    pub loc: Option<SourceLoc>,
    pub fields: Vec<Field>,
    pub byte_size: Option<u64>,
    pub is_defined: bool,
}

impl CompositeType {
    pub fn forward(kind: CompositeKind, tag: Name) -> Self {
        Self {
            kind,
            tag,
            loc: None,
            fields: Vec::new(),
            byte_size: None,
            is_defined: false,
        }
    }
}

/// An enumeration, possibly still a forward declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub tag: Name,
    pub byte_size: Option<u64>,
    pub loc: Option<SourceLoc>,
    pub enumerators: Vec<Enumerator>,
}

impl EnumType {
    pub fn forward(tag: Name) -> Self {
        Self {
            tag,
            byte_size: None,
            loc: None,
            enumerators: Vec::new(),
        }
    }
}

/// A function type. `ret` is `None` for `void`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub ret: Option<DebugId>,
    pub prototyped: bool,
    pub params: Vec<(Name, DebugId)>,
}

/// A typedef name. `target` is `None` until the typedef is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefType {
    pub name: Name,
    pub loc: Option<SourceLoc>,
    pub target: Option<DebugId>,
}

/// Dimension sizes of a (possibly multi-dimensional) array, outermost first.
pub type ArrayDims = SmallVec<[Option<u64>; 2]>;

/// One interned type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Void,
    Integer(IntKind),
    Float(FloatKind),
    Pointer { pointee: DebugId },
    Array { element: DebugId, dims: ArrayDims },
    Composite(CompositeType),
    Enum(EnumType),
    Function(FunctionType),
    Typedef(TypedefType),
    Const { inner: DebugId },
    Volatile { inner: DebugId },
}

impl TypeDescriptor {
    /// Variant name used in invariant-violation reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Pointer { .. } => "pointer",
            Self::Array { .. } => "array",
            Self::Composite(_) => "composite",
            Self::Enum(_) => "enum",
            Self::Function(_) => "function",
            Self::Typedef(_) => "typedef",
            Self::Const { .. } => "const",
            Self::Volatile { .. } => "volatile",
        }
    }

    /// Source location, for the variants that carry one.
    pub fn loc(&self) -> Option<SourceLoc> {
        match self {
            Self::Composite(c) => c.loc,
            Self::Enum(e) => e.loc,
            Self::Typedef(t) => t.loc,
            _ => None,
        }
    }
}
