//! Per-function code label resolution.
//!
//! The code generator refers to positions inside a function by label
//! number before it knows their addresses; once resolved, the address is
//! recorded here so the serializer can translate labels found in ranges.

use dbrepo_ir::{Address, SymbolId};
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct LabelTable {
    addresses: FxHashMap<(SymbolId, u32), Address>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.addresses.clear();
    }

    /// Record the address of label `position` in `function`. Last write wins.
    pub fn add_label(&mut self, function: SymbolId, position: u32, address: Address) {
        self.addresses.insert((function, position), address);
    }

    pub fn translate_label(&self, function: SymbolId, position: u32) -> Option<Address> {
        self.addresses.get(&(function, position)).copied()
    }
}
