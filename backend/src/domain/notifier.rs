//! Change subscriptions for the sale list.
//!
//! Presentation layers register a callback once and get told about every
//! completed write, so they know when to re-read the list and summaries.

use log::debug;
use std::sync::{Arc, Mutex, MutexGuard};

use super::models::{SaleKey, StoredSale};

/// A write that has completed in the record store
#[derive(Debug, Clone, PartialEq)]
pub enum SaleChange {
    Added(StoredSale),
    Deleted(SaleKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&SaleChange) + Send + Sync>;

#[derive(Default)]
struct NotifierState {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

#[derive(Clone, Default)]
pub struct ChangeNotifier {
    state: Arc<Mutex<NotifierState>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, NotifierState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SaleChange) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, Arc::new(listener)));
        debug!("Registered sale change listener {:?}", id);
        id
    }

    /// Returns false when the id was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(listener_id, _)| *listener_id != id);
        state.listeners.len() < before
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Call every listener with `change`.
    ///
    /// Listeners run after the lock is released so they may subscribe,
    /// unsubscribe or read the store themselves.
    pub fn notify(&self, change: &SaleChange) {
        let listeners: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        debug!("Notifying {} listener(s) of {:?}", listeners.len(), change);
        for listener in listeners {
            listener(change);
        }
    }
}
