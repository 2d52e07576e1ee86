//! Type expressions as the frontend spells them.
//!
//! A `TypeExpr` is a tree: each layer carries its own attribute list, so a
//! qualifier can appear at any depth (`int * const`, `const int *`). The
//! repository canonicalizes and interns these trees; this crate only
//! describes them.

use smallvec::SmallVec;

use crate::{Name, Stamp};

/// A type attribute attached to one layer of a type expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Attr {
    Const,
    Volatile,
    Restrict,
    /// `_Alignas(n)` / `__attribute__((aligned(n)))`.
    Aligned(u32),
    /// Any vendor attribute, by name.
    Custom(Name),
}

impl Attr {
    /// Whether the attribute is a const/volatile qualifier.
    #[inline]
    pub const fn is_cv(self) -> bool {
        matches!(self, Self::Const | Self::Volatile)
    }
}

/// Attribute list of one layer, outermost first.
pub type Attrs = SmallVec<[Attr; 2]>;

/// Integer kinds of the source language.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IntKind {
    Bool,
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
}

impl IntKind {
    /// The spelling of the kind in source.
    pub const fn c_name(self) -> &'static str {
        match self {
            Self::Bool => "_Bool",
            Self::Char => "char",
            Self::SChar => "signed char",
            Self::UChar => "unsigned char",
            Self::Short => "short",
            Self::UShort => "unsigned short",
            Self::Int => "int",
            Self::UInt => "unsigned int",
            Self::Long => "long",
            Self::ULong => "unsigned long",
            Self::LongLong => "long long",
            Self::ULongLong => "unsigned long long",
        }
    }
}

/// Floating-point kinds of the source language.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FloatKind {
    Float,
    Double,
    LongDouble,
}

impl FloatKind {
    pub const fn c_name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
        }
    }
}

/// Struct or union.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CompositeKind {
    Struct,
    Union,
}

impl CompositeKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
        }
    }
}

/// A type expression.
///
/// References to tags (`struct S`, `enum E`) and typedef names carry both the
/// spelled name and the frontend stamp of the declaration they resolve to.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeExpr {
    Void {
        attrs: Attrs,
    },
    Int {
        kind: IntKind,
        attrs: Attrs,
    },
    Float {
        kind: FloatKind,
        attrs: Attrs,
    },
    Pointer {
        pointee: Box<TypeExpr>,
        attrs: Attrs,
    },
    Array {
        elem: Box<TypeExpr>,
        len: Option<u64>,
        attrs: Attrs,
    },
    /// `params` is `None` for an unprototyped (K&R) function type.
    Function {
        ret: Box<TypeExpr>,
        params: Option<Vec<(Name, TypeExpr)>>,
        variadic: bool,
        attrs: Attrs,
    },
    /// A typedef name.
    Named {
        name: Name,
        stamp: Stamp,
        attrs: Attrs,
    },
    Composite {
        kind: CompositeKind,
        tag: Name,
        stamp: Stamp,
        attrs: Attrs,
    },
    Enum {
        tag: Name,
        stamp: Stamp,
        attrs: Attrs,
    },
}

impl TypeExpr {
    pub fn void() -> Self {
        Self::Void {
            attrs: Attrs::new(),
        }
    }

    pub fn int(kind: IntKind) -> Self {
        Self::Int {
            kind,
            attrs: Attrs::new(),
        }
    }

    pub fn float(kind: FloatKind) -> Self {
        Self::Float {
            kind,
            attrs: Attrs::new(),
        }
    }

    pub fn pointer(pointee: TypeExpr) -> Self {
        Self::Pointer {
            pointee: Box::new(pointee),
            attrs: Attrs::new(),
        }
    }

    pub fn array(elem: TypeExpr, len: Option<u64>) -> Self {
        Self::Array {
            elem: Box::new(elem),
            len,
            attrs: Attrs::new(),
        }
    }

    /// A prototyped function type.
    pub fn function(ret: TypeExpr, params: Vec<(Name, TypeExpr)>, variadic: bool) -> Self {
        Self::Function {
            ret: Box::new(ret),
            params: Some(params),
            variadic,
            attrs: Attrs::new(),
        }
    }

    /// An unprototyped function type: `ret ()` in K&R style.
    pub fn unprototyped(ret: TypeExpr) -> Self {
        Self::Function {
            ret: Box::new(ret),
            params: None,
            variadic: false,
            attrs: Attrs::new(),
        }
    }

    pub fn named(name: Name, stamp: Stamp) -> Self {
        Self::Named {
            name,
            stamp,
            attrs: Attrs::new(),
        }
    }

    pub fn composite(kind: CompositeKind, tag: Name, stamp: Stamp) -> Self {
        Self::Composite {
            kind,
            tag,
            stamp,
            attrs: Attrs::new(),
        }
    }

    pub fn enumeration(tag: Name, stamp: Stamp) -> Self {
        Self::Enum {
            tag,
            stamp,
            attrs: Attrs::new(),
        }
    }

    /// Wrap this layer in one more attribute, which becomes the outermost.
    #[must_use]
    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs_mut().insert(0, attr);
        self
    }

    /// Attributes of the outermost layer, outermost first.
    pub fn attrs(&self) -> &Attrs {
        match self {
            Self::Void { attrs }
            | Self::Int { attrs, .. }
            | Self::Float { attrs, .. }
            | Self::Pointer { attrs, .. }
            | Self::Array { attrs, .. }
            | Self::Function { attrs, .. }
            | Self::Named { attrs, .. }
            | Self::Composite { attrs, .. }
            | Self::Enum { attrs, .. } => attrs,
        }
    }

    pub fn attrs_mut(&mut self) -> &mut Attrs {
        match self {
            Self::Void { attrs }
            | Self::Int { attrs, .. }
            | Self::Float { attrs, .. }
            | Self::Pointer { attrs, .. }
            | Self::Array { attrs, .. }
            | Self::Function { attrs, .. }
            | Self::Named { attrs, .. }
            | Self::Composite { attrs, .. }
            | Self::Enum { attrs, .. } => attrs,
        }
    }

    /// Whether the outermost layer is `void` (ignoring attributes).
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_attr_prepends() {
        let ty = TypeExpr::int(IntKind::Int)
            .with_attr(Attr::Volatile)
            .with_attr(Attr::Const);
        assert_eq!(ty.attrs().as_slice(), &[Attr::Const, Attr::Volatile]);
    }

    #[test]
    fn test_attrs_are_per_layer() {
        let ty = TypeExpr::pointer(TypeExpr::int(IntKind::Char).with_attr(Attr::Const))
            .with_attr(Attr::Restrict);
        assert_eq!(ty.attrs().as_slice(), &[Attr::Restrict]);
        let TypeExpr::Pointer { pointee, .. } = &ty else {
            panic!("expected pointer");
        };
        assert_eq!(pointee.attrs().as_slice(), &[Attr::Const]);
    }

    #[test]
    fn test_cv_classification() {
        assert!(Attr::Const.is_cv());
        assert!(Attr::Volatile.is_cv());
        assert!(!Attr::Restrict.is_cv());
        assert!(!Attr::Aligned(16).is_cv());
    }
}
