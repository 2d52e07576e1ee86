//! Vocabulary shared between the debug-information repository and its
//! collaborators.
//!
//! This crate contains the data the repository consumes but never owns:
//! - Interned names (`Name`) and the `StringInterner` that produces them
//! - Identifier spaces of the other passes: frontend stamps, backend
//!   symbols, frontend scope ids, code addresses
//! - Source locations and storage-location descriptors
//! - Type expressions as the frontend spells them, qualifier chains included
//! - Top-level and local declarations
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and file paths are `Name(u32)`
//! - **Newtype Every Id Space**: a `Stamp` can never be passed where a
//!   `SymbolId` is expected
//! - **Input Only**: nothing here knows about `DebugId`s

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod decl;
mod ids;
mod interner;
mod location;
mod name;
mod type_expr;

pub use decl::{
    CompositeDecl, Declaration, EnumDecl, Enumerator, FieldDecl, FunDecl, LocalDecl, ParamDecl,
    ProtoDecl, StorageClass, TypedefDecl, VarDecl,
};
pub use ids::{Address, ScopeId, Stamp, SymbolId};
pub use interner::{InternError, StringInterner};
pub use location::{LocationDesc, SourceLoc};
pub use name::Name;
pub use type_expr::{Attr, Attrs, CompositeKind, FloatKind, IntKind, TypeExpr};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Address, Name, SourceLoc, Stamp, SymbolId};
    static_assert_size!(Name, 4);
    static_assert_size!(Stamp, 4);
    static_assert_size!(SymbolId, 4);
    static_assert_size!(Address, 8);
    static_assert_size!(SourceLoc, 12);
}
