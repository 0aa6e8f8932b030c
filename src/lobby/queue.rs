use crate::Unique;
use crate::players::Handle;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

/// Process-wide FIFO of players waiting for an opponent.
///
/// Only three operations exist, and each takes the lock exactly once for
/// constant work. Nothing ever awaits while holding it, so a plain
/// `std::sync::Mutex` is enough even inside the async runtime.
#[derive(Default)]
pub struct Lobby {
    queue: Mutex<VecDeque<Handle>>,
}

impl Lobby {
    /// Append at the tail. Never fails.
    pub fn enqueue(&self, handle: Handle) {
        let mut queue = self.queue();
        log::trace!("[lobby] enqueue {} ({} waiting)", handle.id(), queue.len() + 1);
        queue.push_back(handle);
    }
    /// Remove the two oldest handles together, or none at all.
    pub fn try_pair(&self) -> Option<(Handle, Handle)> {
        let mut queue = self.queue();
        match queue.len() {
            0 | 1 => None,
            _ => queue.pop_front().zip(queue.pop_front()),
        }
    }
    pub fn waiting(&self) -> usize {
        self.queue().len()
    }
    /// A panic elsewhere never leaves the deque half-updated, since every
    /// critical section is a single push or pop.
    fn queue(&self) -> MutexGuard<'_, VecDeque<Handle>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
