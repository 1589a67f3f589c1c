use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

/// Sequence number taken before a fetch starts.
///
/// Tickets are handed out in increasing order per cell. A response may only
/// land if its ticket is newer than the one that produced the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    applied: u64,
    updated_at: Option<DateTime<Utc>>,
    closed: bool,
}

/// State container owned by one view.
///
/// Holds the latest view model and decides which responses may replace it.
/// Cloning shares the same state.
#[derive(Debug)]
pub struct ViewCell<T> {
    slot: Arc<Mutex<Slot<T>>>,
    next: Arc<AtomicU64>,
}

impl<T> Clone for ViewCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            next: Arc::clone(&self.next),
        }
    }
}

impl<T> Default for ViewCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewCell<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                value: None,
                applied: 0,
                updated_at: None,
                closed: false,
            })),
            next: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Reserve a ticket for a fetch that is about to start.
    pub fn begin(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replace the value wholesale if `ticket` is still current.
    ///
    /// Returns `false` when the cell is closed or a newer ticket already
    /// applied; the value is dropped in that case.
    pub fn apply(&self, ticket: Ticket, value: T) -> bool {
        let mut slot = self.lock();
        if slot.closed || ticket.0 <= slot.applied {
            return false;
        }
        slot.value = Some(value);
        slot.applied = ticket.0;
        slot.updated_at = Some(Utc::now());
        true
    }

    /// Edit the value in place under a fresh ticket, starting from `seed()`
    /// when the cell holds nothing yet.
    ///
    /// Used for optimistic updates: any fetch that started earlier can no
    /// longer overwrite the edit. Returns `false` once the cell is closed.
    pub fn upsert(&self, seed: impl FnOnce() -> T, edit: impl FnOnce(&mut T)) -> bool {
        let ticket = self.begin();
        let mut slot = self.lock();
        if slot.closed || ticket.0 <= slot.applied {
            return false;
        }
        edit(slot.value.get_or_insert_with(seed));
        slot.applied = ticket.0;
        true
    }

    /// Stop accepting values. Waits for an in-progress `apply` to finish, so
    /// nothing lands after this returns.
    pub fn close(&self) {
        self.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// When the current value was last replaced by a fetch.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.lock().updated_at
    }

    /// Sequence number of the ticket behind the current value (0 = none).
    pub fn applied_seq(&self) -> u64 {
        self.lock().applied
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> ViewCell<T> {
    /// Copy of the current value, `None` before the first successful fetch.
    pub fn snapshot(&self) -> Option<T> {
        self.lock().value.clone()
    }
}
