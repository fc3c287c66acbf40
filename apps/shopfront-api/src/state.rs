//! # Application State
//!
//! The one shared [`Store`], behind a mutex.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Access                                         │
//! │                                                                         │
//! │  Command                     AppState                  Store            │
//! │  ───────                     ────────                  ─────            │
//! │                                                                         │
//! │  search() ─────────────────► with_store() ──────────► catalog()        │
//! │                                                                         │
//! │  add_item_to_order() ──────► with_store_mut() ──────► orders_mut()     │
//! │                                                                         │
//! │  login() ──────────────────► with_store_mut() ──────► customers_mut()  │
//! │                                                                         │
//! │  NOTE: Every command holds the lock for its whole body, so two         │
//! │        commands on the same session token never interleave.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use shopfront_store::Store;

/// Shared store handle.
///
/// ## Why Not RwLock?
/// Most commands mutate (even `getActiveOrder` may create an order).
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let page = state.with_store(|store| store.catalog().list_products(0, 12));
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Store) -> R,
    {
        let store = self.store.lock().expect("Store mutex poisoned");
        f(&store)
    }

    /// Executes a function with write access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_store_mut(|store| store.orders_mut().apply_coupon(token, "SAVE10"))?;
    /// ```
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Store) -> R,
    {
        let mut store = self.store.lock().expect("Store mutex poisoned");
        f(&mut store)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_store::StoreConfig;

    #[test]
    fn test_clones_share_one_store() {
        let state = AppState::new(Store::new(StoreConfig::default()));
        let other = state.clone();

        other.with_store_mut(|store| {
            store.orders_mut().active_order("anonymous");
        });

        assert_eq!(state.with_store(|store| store.orders().len()), 1);
    }
}
