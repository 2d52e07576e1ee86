//! Debug-information repository for a compiler backend.
//!
//! Accumulates, deduplicates and cross-references everything a symbolic
//! debug table needs: type descriptions, global and local symbol metadata,
//! lexical scope nesting, variable storage-location history and per-section
//! file numbering. Nothing here encodes bytes; the serializer reads the
//! tables once code emission for the unit is complete.
//!
//! # Passes
//!
//! ```text
//! frontend ──stamps──▶ ┌──────────────────┐
//! binder ───symbols──▶ │  DebugRepository │ ──▶ serializer
//! codegen ──addresses▶ └──────────────────┘
//! ```
//!
//! Each pass names entities in its own identifier space. The repository
//! reconciles them into one [`DebugId`] space shared by the type,
//! definition and local tables.
//!
//! # Failure Policy
//!
//! - A lookup that bridges identifier spaces and misses skips the update.
//! - A table entry of the wrong variant is a [`DebugRepoError`].
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=dbrepo=debug`: allocations, patches, fan-out, finalization.
//! - `RUST_LOG=dbrepo=trace`: additionally every ignored bridging miss.

mod config;
pub mod defs;
mod error;
mod id;
pub mod labels;
pub mod locals;
pub mod ranges;
mod repository;
pub mod sections;
mod stack;
pub mod types;

use std::sync::Once;

pub use config::{DebugLevel, RepoConfig, TypeKeyMode};
pub use defs::{Definition, FunctionDef, GlobalVariable, Parameter, PcRange};
pub use error::{DebugRepoError, Table};
pub use id::{DebugId, IdAllocator};
pub use locals::{LocalEntry, LocalVariable, Scope};
pub use ranges::{LiveRange, ScopeRange, VarLocation};
pub use repository::DebugRepository;
pub use sections::{CompilationSection, FileNumber};
pub use types::{
    BitfieldLayout, CompositeType, EnumType, Field, FunctionType, TypeDescriptor, TypedefType,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
