//! Job control for cancel: shared abort tokens and a global cancel flag.
//!
//! When the scheduler runs with a `JobControl`, each running item is registered
//! with an abort token. A control client (e.g. `ytq cancel 3` via socket) can
//! request abort for one item or cancel the whole run; workers check the
//! tokens while yt-dlp is running and kill the process. Aborts for items that
//! have not started yet are remembered and honoured when a worker picks them up.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::queue_db::ItemId;

/// Abort token handed to one download. Trips when either the item itself or
/// the whole run is cancelled.
#[derive(Clone, Debug)]
pub struct AbortToken {
    item: Arc<AtomicBool>,
    all: Arc<AtomicBool>,
}

impl AbortToken {
    pub fn is_aborted(&self) -> bool {
        self.item.load(Ordering::Relaxed) || self.all.load(Ordering::Relaxed)
    }
}

/// Result of `JobControl::request_abort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortRequest {
    /// The item was downloading; its process will be killed.
    Running,
    /// The item has not started; it will be cancelled when claimed.
    Pending,
}

/// Shared registry of item id -> abort token plus the run-wide cancel flag.
#[derive(Default)]
pub struct JobControl {
    items: RwLock<HashMap<ItemId, Arc<AtomicBool>>>,
    pending_aborts: RwLock<HashSet<ItemId>>,
    cancel_all: Arc<AtomicBool>,
}

impl JobControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a running item; returns the abort token to pass to the download.
    /// The token starts tripped if an abort for the item arrived before it started.
    pub fn register(&self, item_id: ItemId) -> AbortToken {
        let item = Arc::new(AtomicBool::new(self.take_pending_abort(item_id)));
        if let Ok(mut items) = self.items.write() {
            items.insert(item_id, Arc::clone(&item));
        }
        AbortToken {
            item,
            all: Arc::clone(&self.cancel_all),
        }
    }

    /// Unregister an item (call when its download finishes, success or failure).
    pub fn unregister(&self, item_id: ItemId) {
        if let Ok(mut items) = self.items.write() {
            items.remove(&item_id);
        }
    }

    /// Request abort for one item. A running item is stopped now; any other
    /// item is remembered and cancelled when a worker claims it.
    pub fn request_abort(&self, item_id: ItemId) -> AbortRequest {
        if let Ok(items) = self.items.read() {
            if let Some(token) = items.get(&item_id) {
                token.store(true, Ordering::Relaxed);
                return AbortRequest::Running;
            }
        }
        if let Ok(mut pending) = self.pending_aborts.write() {
            pending.insert(item_id);
        }
        AbortRequest::Pending
    }

    /// True (once) if an abort was requested for `item_id` before it started.
    pub fn take_pending_abort(&self, item_id: ItemId) -> bool {
        self.pending_aborts
            .write()
            .map(|mut pending| pending.remove(&item_id))
            .unwrap_or(false)
    }

    /// Cancel the whole run: running downloads stop, unstarted ones are skipped.
    pub fn cancel_all(&self) {
        self.cancel_all.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_all.load(Ordering::Relaxed)
    }

    /// Clear the run-wide flag and pending aborts before a new run.
    pub fn reset(&self) {
        self.cancel_all.store(false, Ordering::Relaxed);
        if let Ok(mut pending) = self.pending_aborts.write() {
            pending.clear();
        }
    }

    /// Items currently downloading, in id order.
    pub fn running(&self) -> Vec<ItemId> {
        self.items
            .read()
            .map(|items| {
                let mut ids: Vec<ItemId> = items.keys().copied().collect();
                ids.sort_unstable();
                ids
            })
            .unwrap_or_default()
    }
}

/// Default path for the control socket (same XDG state dir as the DB).
pub fn default_control_socket_path() -> std::io::Result<PathBuf> {
    let dir = xdg::BaseDirectories::with_prefix("ytq")?.get_state_home();
    Ok(dir.join("control.sock"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_one_item_leaves_others_running() {
        let control = JobControl::new();
        let a = control.register(1);
        let b = control.register(2);
        assert_eq!(control.request_abort(1), AbortRequest::Running);
        assert!(a.is_aborted());
        assert!(!b.is_aborted());
    }

    #[test]
    fn cancel_all_trips_every_token() {
        let control = JobControl::new();
        let a = control.register(1);
        let b = control.register(2);
        control.cancel_all();
        assert!(control.is_cancelled());
        assert!(a.is_aborted());
        assert!(b.is_aborted());

        control.reset();
        assert!(!a.is_aborted());
    }

    #[test]
    fn abort_before_start_trips_token_on_register() {
        let control = JobControl::new();
        let t = control.register(5);
        control.unregister(5);
        assert_eq!(control.request_abort(5), AbortRequest::Pending);
        assert!(!t.is_aborted());
        assert!(control.running().is_empty());

        let again = control.register(5);
        assert!(again.is_aborted());
        control.unregister(5);
        // Consumed by the first register.
        assert!(!control.register(5).is_aborted());
    }

    #[test]
    fn pending_abort_is_taken_once() {
        let control = JobControl::new();
        control.request_abort(9);
        assert!(control.take_pending_abort(9));
        assert!(!control.take_pending_abort(9));

        control.request_abort(9);
        control.reset();
        assert!(!control.take_pending_abort(9));
    }

    #[test]
    fn running_lists_registered_items_in_order() {
        let control = JobControl::new();
        let _b = control.register(7);
        let _a = control.register(3);
        assert_eq!(control.running(), vec![3, 7]);
    }
}
