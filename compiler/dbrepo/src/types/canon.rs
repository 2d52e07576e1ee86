//! Canonicalization and dedup keys for type expressions.

use std::fmt;

use dbrepo_ir::{Attr, Attrs, TypeExpr};

use crate::config::TypeKeyMode;
use crate::stack::ensure_sufficient_stack;

/// Dedup key of a canonical type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum TypeKey {
    Spelled(String),
    Structural(TypeExpr),
}

impl TypeKey {
    pub(super) fn of(mode: TypeKeyMode, ty: &TypeExpr) -> Self {
        match mode {
            TypeKeyMode::Spelling => Self::Spelled(Spelling(ty).to_string()),
            TypeKeyMode::Structural => Self::Structural(ty.clone()),
        }
    }
}

/// Drop every attribute that is not `const`/`volatile`, at every layer.
pub(super) fn strip_attributes(ty: &TypeExpr) -> TypeExpr {
    ensure_sufficient_stack(|| {
        let mut out = match ty {
            TypeExpr::Pointer { pointee, attrs } => TypeExpr::Pointer {
                pointee: Box::new(strip_attributes(pointee)),
                attrs: attrs.clone(),
            },
            TypeExpr::Array { elem, len, attrs } => TypeExpr::Array {
                elem: Box::new(strip_attributes(elem)),
                len: *len,
                attrs: attrs.clone(),
            },
            TypeExpr::Function {
                ret,
                params,
                variadic,
                attrs,
            } => TypeExpr::Function {
                ret: Box::new(strip_attributes(ret)),
                params: params.as_ref().map(|params| {
                    params
                        .iter()
                        .map(|(name, ty)| (*name, strip_attributes(ty)))
                        .collect()
                }),
                variadic: *variadic,
                attrs: attrs.clone(),
            },
            other => other.clone(),
        };
        out.attrs_mut().retain(|attr| attr.is_cv());
        out
    })
}

/// Normalized spelling of a canonical type expression.
///
/// Base types carry their qualifiers as a prefix (`const int`); derived
/// types carry them as a suffix (`int* const`, `int[4] volatile`), so the
/// two placements never print alike. Names print as their interned ids:
/// equal strings share an id, so the spelling is as discriminating as the
/// source text.
struct Spelling<'a>(&'a TypeExpr);

impl fmt::Display for Spelling<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self.0 {
            TypeExpr::Void { attrs } => {
                prefix(f, attrs)?;
                f.write_str("void")
            }
            TypeExpr::Int { kind, attrs } => {
                prefix(f, attrs)?;
                f.write_str(kind.c_name())
            }
            TypeExpr::Float { kind, attrs } => {
                prefix(f, attrs)?;
                f.write_str(kind.c_name())
            }
            TypeExpr::Named { name, attrs, .. } => {
                prefix(f, attrs)?;
                write!(f, "typedef #{}", name.raw())
            }
            TypeExpr::Composite {
                kind, tag, attrs, ..
            } => {
                prefix(f, attrs)?;
                write!(f, "{} #{}", kind.keyword(), tag.raw())
            }
            TypeExpr::Enum { tag, attrs, .. } => {
                prefix(f, attrs)?;
                write!(f, "enum #{}", tag.raw())
            }
            TypeExpr::Pointer { pointee, attrs } => {
                write!(f, "{}*", Spelling(pointee))?;
                suffix(f, attrs)
            }
            TypeExpr::Array { elem, len, attrs } => {
                match len {
                    Some(n) => write!(f, "{}[{n}]", Spelling(elem))?,
                    None => write!(f, "{}[]", Spelling(elem))?,
                }
                suffix(f, attrs)
            }
            TypeExpr::Function {
                ret,
                params,
                variadic,
                attrs,
            } => {
                write!(f, "{}(", Spelling(ret))?;
                match params {
                    None => {}
                    Some(params) if params.is_empty() && !variadic => f.write_str("void")?,
                    Some(params) => {
                        for (i, (_, ty)) in params.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{}", Spelling(ty))?;
                        }
                        if *variadic {
                            f.write_str(if params.is_empty() { "..." } else { ", ..." })?;
                        }
                    }
                }
                f.write_str(")")?;
                suffix(f, attrs)
            }
        })
    }
}

fn qualifier(attr: Attr) -> Option<&'static str> {
    match attr {
        Attr::Const => Some("const"),
        Attr::Volatile => Some("volatile"),
        Attr::Restrict | Attr::Aligned(_) | Attr::Custom(_) => None,
    }
}

fn prefix(f: &mut fmt::Formatter<'_>, attrs: &Attrs) -> fmt::Result {
    for q in attrs.iter().filter_map(|a| qualifier(*a)) {
        write!(f, "{q} ")?;
    }
    Ok(())
}

fn suffix(f: &mut fmt::Formatter<'_>, attrs: &Attrs) -> fmt::Result {
    for q in attrs.iter().filter_map(|a| qualifier(*a)) {
        write!(f, " {q}")?;
    }
    Ok(())
}
