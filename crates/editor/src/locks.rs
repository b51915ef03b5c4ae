#![forbid(unsafe_code)]

use nb_core::NodeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OwnedMutexGuard;

type Slot = Arc<tokio::sync::Mutex<()>>;

/// One FIFO lock per node id. Remote mutations of a node run one at a time, in the order
/// they were issued, while different nodes proceed independently.
#[derive(Debug, Default)]
pub(crate) struct NodeLocks {
    slots: Mutex<HashMap<NodeId, Slot>>,
}

impl NodeLocks {
    pub(crate) async fn acquire(&self, id: &NodeId) -> NodeTurn<'_> {
        let slot = self.slots().entry(id.clone()).or_default().clone();
        let guard = slot.lock_owned().await;
        NodeTurn {
            locks: self,
            id: id.clone(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots().len()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<NodeId, Slot>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Held while a node's remote call and its local effect are in progress.
pub(crate) struct NodeTurn<'a> {
    locks: &'a NodeLocks,
    id: NodeId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for NodeTurn<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut slots = self.locks.slots();
        // Only the map still references the slot: nobody holds or waits for it.
        let idle = slots
            .get(&self.id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1);
        if idle {
            slots.remove(&self.id);
        }
    }
}
