//! Declarations handed over by the frontend while it walks a unit.

use crate::{CompositeKind, Name, SourceLoc, Stamp, TypeExpr};

/// Storage class as written on a declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum StorageClass {
    /// No storage class specifier.
    #[default]
    Default,
    Extern,
    Static,
    Auto,
    Register,
}

impl StorageClass {
    /// Whether a file-scope declaration with this class is visible to other units.
    #[inline]
    pub const fn is_externally_visible(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// A file-scope variable declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarDecl {
    pub name: Name,
    pub stamp: Stamp,
    pub storage: StorageClass,
    pub ty: TypeExpr,
    pub has_init: bool,
    pub loc: SourceLoc,
}

/// A formal parameter of a function definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: Name,
    pub stamp: Stamp,
    pub ty: TypeExpr,
}

/// A function definition (with a body).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunDecl {
    pub name: Name,
    pub stamp: Stamp,
    pub storage: StorageClass,
    pub ret: TypeExpr,
    pub params: Vec<ParamDecl>,
    pub variadic: bool,
    pub loc: SourceLoc,
}

/// A function declaration without a body.
///
/// Also produced for implicit declarations introduced by a call to a
/// function that has no visible prototype yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtoDecl {
    pub name: Name,
    pub stamp: Stamp,
    pub storage: StorageClass,
    /// Normally a `TypeExpr::Function`.
    pub ty: TypeExpr,
    pub loc: SourceLoc,
}

/// One member of a struct or union definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: TypeExpr,
    /// Declared width for a bitfield member.
    pub bit_width: Option<u32>,
}

/// A struct/union declaration: forward (`fields == None`) or full.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeDecl {
    pub kind: CompositeKind,
    pub tag: Name,
    pub stamp: Stamp,
    pub loc: SourceLoc,
    pub fields: Option<Vec<FieldDecl>>,
    pub byte_size: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enumerator {
    pub name: Name,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDecl {
    pub tag: Name,
    pub stamp: Stamp,
    pub loc: SourceLoc,
    pub enumerators: Vec<Enumerator>,
    pub byte_size: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedefDecl {
    pub name: Name,
    pub stamp: Stamp,
    pub ty: TypeExpr,
    pub loc: SourceLoc,
}

/// A block-scope variable declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalDecl {
    pub name: Name,
    pub stamp: Stamp,
    pub storage: StorageClass,
    pub ty: TypeExpr,
    pub loc: SourceLoc,
}

/// Any file-scope declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Declaration {
    Variable(VarDecl),
    Function(FunDecl),
    Prototype(ProtoDecl),
    Composite(CompositeDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
}

impl Declaration {
    /// The source location of the declaration.
    pub fn loc(&self) -> SourceLoc {
        match self {
            Self::Variable(d) => d.loc,
            Self::Function(d) => d.loc,
            Self::Prototype(d) => d.loc,
            Self::Composite(d) => d.loc,
            Self::Enum(d) => d.loc,
            Self::Typedef(d) => d.loc,
        }
    }
}
