//! One-shot timers with cancellable handles.

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    handle: TimerHandle,
    due_ms: f64,
    item: T,
}

/// Timers keyed to a caller-supplied millisecond clock
#[derive(Debug, Clone)]
pub struct DrawTimers<T> {
    /// Sorted by due time; ties keep scheduling order
    pending: Vec<Pending<T>>,
    next_id: u64,
}

impl<T> Default for DrawTimers<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> DrawTimers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `item` to become due at `due_ms`
    pub fn schedule(&mut self, due_ms: f64, item: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let idx = self.pending.partition_point(|p| p.due_ms <= due_ms);
        self.pending.insert(
            idx,
            Pending {
                handle,
                due_ms,
                item,
            },
        );
        handle
    }

    /// Cancel one timer; false when it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|p| p.handle == handle) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Remove and return the items due at `now_ms`, in due order
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let due = self.pending.partition_point(|p| p.due_ms <= now_ms);
        self.pending.drain(..due).map(|p| p.item).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
