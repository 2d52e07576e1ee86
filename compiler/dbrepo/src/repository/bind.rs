//! Symbol binding: attaching backend symbols to what the frontend recorded.

use dbrepo_ir::{Address, Stamp, SymbolId};

use super::DebugRepository;
use crate::defs::{Definition, PcRange};
use crate::error::DebugRepoError;
use crate::id::DebugId;

impl DebugRepository {
    /// Attach a backend symbol to the global with the given stamp.
    ///
    /// For a function this also mirrors its scope tree into symbol-keyed
    /// space, so the code generator can address scopes by symbol. Scopes
    /// entered under any stamp of the function are mirrored, not only those
    /// of `stamp`. Returns `None` if the stamp is unknown.
    pub fn bind_backend_symbol(&mut self, stamp: Stamp, symbol: SymbolId) -> Option<DebugId> {
        let id = self.defs.bind_symbol(stamp, symbol)?;
        if matches!(self.defs.get(id), Some(Definition::Function(_))) {
            for function in self.defs.stamps_of(id) {
                self.locals.fan_out(function, symbol);
            }
        }
        Some(id)
    }

    /// Set a function's low/high pc, located by its symbol.
    pub fn bind_function_address_range(
        &mut self,
        symbol: SymbolId,
        low: Address,
        high: Address,
    ) -> Result<bool, DebugRepoError> {
        self.defs.bind_pc_range(symbol, PcRange { low, high })
    }

    /// Attach a backend symbol to one parameter of a function.
    pub fn bind_parameter_symbol(
        &mut self,
        function: Stamp,
        param: Stamp,
        symbol: SymbolId,
    ) -> Result<bool, DebugRepoError> {
        self.defs.bind_parameter_symbol(function, param, symbol)
    }

    /// Attach a backend symbol to a local variable.
    pub fn bind_local_symbol(&mut self, stamp: Stamp, symbol: SymbolId) -> Option<DebugId> {
        self.locals.bind_symbol(stamp, symbol)
    }
}
