//! Server-held cart registry.
//!
//! One [`CartStore`] per shopper session, keyed by a cart id stored in the
//! session. The per-cart mutex serializes mutations, preserving the
//! merge-by-identity-key invariant when two requests for the same session
//! race.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use uuid::Uuid;

use suplefit_cart::CartStore;

/// Shared handle to one session's cart.
pub type CartHandle = Arc<Mutex<CartStore>>;

/// Registry of live carts.
///
/// Cheaply cloneable; all clones share the same map. Carts are volatile:
/// they live for the duration of the process, matching the cart engine's
/// no-persistence contract.
#[derive(Debug, Clone, Default)]
pub struct CartRegistry {
    inner: Arc<RwLock<HashMap<Uuid, CartHandle>>>,
}

impl CartRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh cart and return its id and handle.
    #[must_use]
    pub fn create(&self) -> (Uuid, CartHandle) {
        let id = Uuid::new_v4();
        let handle: CartHandle = Arc::new(Mutex::new(CartStore::new()));
        self.write().insert(id, Arc::clone(&handle));
        tracing::debug!(cart_id = %id, "created cart");
        (id, handle)
    }

    /// Look up an existing cart.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<CartHandle> {
        self.read().get(&id).cloned()
    }

    /// Look up a cart, creating one under the given id if absent.
    ///
    /// Used when a session carries a cart id the registry no longer knows
    /// (e.g., after a restart); the shopper gets an empty cart rather than
    /// an error.
    #[must_use]
    pub fn get_or_create(&self, id: Uuid) -> CartHandle {
        if let Some(handle) = self.get(id) {
            return handle;
        }
        let mut map = self.write();
        Arc::clone(
            map.entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(CartStore::new()))),
        )
    }

    /// Drop a cart entirely.
    pub fn remove(&self, id: Uuid) {
        self.write().remove(&id);
    }

    /// Number of live carts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no carts are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, CartHandle>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, CartHandle>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lock a cart handle, recovering from a poisoned lock.
///
/// Cart operations never panic mid-mutation, so a poisoned lock still holds
/// a consistent store.
pub fn lock(handle: &CartHandle) -> MutexGuard<'_, CartStore> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
