//! Per-exchange critical sections.
//!
//! Joining, leaving and the check-then-match sequence for one exchange must
//! not interleave, or two "last participant" joins could both see a full
//! exchange and draw twice. Each exchange gets its own async mutex; different
//! exchanges never block each other.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::common::ExchangeId;

/// Registry of one mutex per exchange. Cloneable, shared by all callers.
#[derive(Clone, Default)]
pub struct ExchangeLocks {
    locks: Arc<RwLock<HashMap<ExchangeId, Arc<Mutex<()>>>>>,
}

impl ExchangeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `exchange_id`. Released when the guard drops.
    pub async fn acquire(&self, exchange_id: ExchangeId) -> OwnedMutexGuard<()> {
        self.lock_for(exchange_id).await.lock_owned().await
    }

    async fn lock_for(&self, exchange_id: ExchangeId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().await.get(&exchange_id) {
            return lock.clone();
        }

        let mut locks = self.locks.write().await;
        locks
            .entry(exchange_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the entry for a deleted exchange.
    pub async fn forget(&self, exchange_id: ExchangeId) {
        self.locks.write().await.remove(&exchange_id);
    }

    pub async fn len(&self) -> usize {
        self.locks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.locks.read().await.is_empty()
    }
}
