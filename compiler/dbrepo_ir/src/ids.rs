//! Identifier newtypes for the passes that feed the repository.
//!
//! Each pass names "the same" entity in its own space:
//! - the frontend assigns a [`Stamp`] to every declared symbol and a
//!   [`ScopeId`] to every lexical block,
//! - the symbol binder assigns a [`SymbolId`] (backend atom),
//! - the code generator reports [`Address`]es.
//!
//! Keeping them as distinct newtypes makes cross-space mix-ups a type error.

use std::fmt;

macro_rules! define_u32_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_u32_id!(
    /// Frontend-assigned identity of a declared symbol, stable within one unit.
    Stamp
);

define_u32_id!(
    /// Backend-assigned identity (atom) of a global, function or local,
    /// bound after the frontend pass completes.
    SymbolId
);

define_u32_id!(
    /// Frontend-assigned identity of a lexical block within a function.
    ScopeId
);

/// A resolved code address (or code label) reported by the code generator.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Address(u64);

impl Address {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{:x})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}
