//! Source locations and storage-location descriptors.

use std::fmt;

use crate::Name;

/// A position in a source file.
///
/// Layout: 12 bytes (file name + 1-based line + 1-based column).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SourceLoc {
    pub file: Name,
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    #[inline]
    pub const fn new(file: Name, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }
}

/// Where a variable's value lives, as described by the code generator.
///
/// The repository never interprets this; it only stores it next to the
/// address range (or frame slot) it applies to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LocationDesc {
    /// A machine register, by backend register number.
    Register(u16),
    /// A slot at a signed offset from the frame base.
    FrameSlot(i64),
    /// A slot at a signed offset from the stack pointer.
    StackSlot(i64),
    /// A statically allocated object, addressed by its backend symbol.
    Static(crate::SymbolId),
}

impl fmt::Display for LocationDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(r) => write!(f, "reg{r}"),
            Self::FrameSlot(off) => write!(f, "fp{off:+}"),
            Self::StackSlot(off) => write!(f, "sp{off:+}"),
            Self::Static(sym) => write!(f, "sym{sym}"),
        }
    }
}
