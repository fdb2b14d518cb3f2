use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use moor_types::constants::ROOT_SYMBOL;
use moor_types::primitives::{CategoryId, ChainSymbol};

use crate::chain::ChainState;
use crate::error::StateError;

/// Shared handle to one chain's folded state.
///
/// The single block-connect writer takes the write lock; proof and RPC
/// readers take read locks and observe whole-`apply` snapshots.
pub type ChainHandle = Arc<RwLock<ChainState>>;

/// Bounded table mapping chain symbol to chain state.
///
/// Slot 0 is always the process's current chain. The root chain is
/// registered eagerly so proof lookups never miss it; if the process runs
/// the root chain itself, the two coincide. Symbol-to-slot assignments are
/// stable for the process lifetime.
#[derive(Debug)]
pub struct StateRegistry {
    capacity: usize,
    current_symbol: ChainSymbol,
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    slots: Vec<ChainHandle>,
    index: HashMap<ChainSymbol, usize>,
}

impl StateRegistry {
    /// Build a registry for a process running `current_symbol`.
    ///
    /// Capacity counts chain slots; it must cover the current chain and the
    /// root chain. Exceeding it later is a configuration error surfaced by
    /// [`StateRegistry::get_or_create`], not a runtime panic.
    pub fn new(
        current_symbol: impl Into<ChainSymbol>,
        current_category: CategoryId,
        capacity: usize,
    ) -> Result<Self, StateError> {
        let current_symbol = current_symbol.into();
        let required = if current_symbol == ROOT_SYMBOL { 1 } else { 2 };
        if capacity < required {
            return Err(StateError::CapacityTooSmall { capacity, required });
        }

        let mut slots = Vec::with_capacity(required);
        let mut index = HashMap::new();
        slots.push(Arc::new(RwLock::new(ChainState::new(
            current_symbol.clone(),
            current_category,
        ))));
        index.insert(current_symbol.clone(), 0);
        if current_symbol != ROOT_SYMBOL {
            slots.push(Arc::new(RwLock::new(ChainState::new(ROOT_SYMBOL, 0))));
            index.insert(ROOT_SYMBOL.to_string(), 1);
        }

        tracing::info!(
            chain = %current_symbol,
            capacity,
            "state registry initialized"
        );

        Ok(Self {
            capacity,
            current_symbol,
            inner: RwLock::new(Inner { slots, index }),
        })
    }

    /// The handle for `symbol`, creating its slot on first sight.
    ///
    /// The empty symbol aliases the current chain. Fails only when the
    /// fixed capacity is exhausted.
    pub fn get_or_create(
        &self,
        symbol: &str,
        category: CategoryId,
    ) -> Result<ChainHandle, StateError> {
        let mut inner = self.write_inner()?;
        if let Some(&slot) = inner.index.get(self.resolve(symbol)) {
            return Ok(Arc::clone(&inner.slots[slot]));
        }
        if inner.slots.len() >= self.capacity {
            return Err(StateError::RegistryFull {
                capacity: self.capacity,
            });
        }
        let handle = Arc::new(RwLock::new(ChainState::new(symbol, category)));
        let slot = inner.slots.len();
        inner.slots.push(Arc::clone(&handle));
        inner.index.insert(symbol.to_string(), slot);
        tracing::debug!(chain = symbol, slot, "chain state slot created");
        Ok(handle)
    }

    /// Resolve `symbol` to a handle without creating anything.
    ///
    /// The empty symbol and any unrecognized symbol resolve to slot 0 (the
    /// current chain). Downstream code depends on this legacy fallback;
    /// turning it into an error is a product decision, not a code cleanup.
    pub fn lookup(&self, symbol: &str) -> Result<ChainHandle, StateError> {
        let inner = self.read_inner()?;
        let slot = inner
            .index
            .get(self.resolve(symbol))
            .copied()
            .unwrap_or(0);
        Ok(Arc::clone(&inner.slots[slot]))
    }

    /// The current chain's handle (slot 0).
    pub fn current(&self) -> Result<ChainHandle, StateError> {
        let inner = self.read_inner()?;
        Ok(Arc::clone(&inner.slots[0]))
    }

    /// The root chain's handle.
    pub fn root(&self) -> Result<ChainHandle, StateError> {
        self.lookup(ROOT_SYMBOL)
    }

    /// The symbol of the current chain.
    pub fn current_symbol(&self) -> &str {
        &self.current_symbol
    }

    /// Handles of every registered chain with the given category, paired
    /// with their symbols, in slot order.
    pub fn by_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<(ChainSymbol, ChainHandle)>, StateError> {
        let inner = self.read_inner()?;
        let mut chains = Vec::new();
        for (symbol, &slot) in &inner.index {
            let handle = &inner.slots[slot];
            let state = handle.read().map_err(|e| StateError::LockPoisoned {
                reason: e.to_string(),
            })?;
            if state.category() == category {
                chains.push((symbol.clone(), Arc::clone(handle)));
            }
        }
        chains.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(chains)
    }

    /// Number of registered chains.
    pub fn len(&self) -> usize {
        self.read_inner().map(|inner| inner.slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn resolve<'a>(&'a self, symbol: &'a str) -> &'a str {
        if symbol.is_empty() {
            &self.current_symbol
        } else {
            symbol
        }
    }

    fn read_inner(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StateError> {
        self.inner.read().map_err(|e| StateError::LockPoisoned {
            reason: e.to_string(),
        })
    }

    fn write_inner(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StateError> {
        self.inner.write().map_err(|e| StateError::LockPoisoned {
            reason: e.to_string(),
        })
    }
}
