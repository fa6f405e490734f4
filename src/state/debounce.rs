use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DebounceHandle(u64);

#[derive(Clone, Debug, PartialEq)]
struct Pending<T> {
    handle: DebounceHandle,
    delay: Duration,
    action: T,
}

/// Holds at most one delayed action. Scheduling a new one cancels whatever was
/// pending. The caller owns the clock: it waits out the delay and then calls
/// [`Debouncer::fire`] with the handle it got back.
#[derive(Clone, Debug, PartialEq)]
pub struct Debouncer<T> {
    next_id: u64,
    pending: Option<Pending<T>>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: None,
        }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: Duration, action: T) -> DebounceHandle {
        self.next_id += 1;
        let handle = DebounceHandle(self.next_id);
        if let Some(previous) = self.pending.take() {
            tracing::trace!(handle = previous.handle.0, "superseded pending action");
        }
        self.pending = Some(Pending {
            handle,
            delay,
            action,
        });
        handle
    }

    pub fn cancel(&mut self, handle: DebounceHandle) -> bool {
        if self.pending_handle() == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Takes the pending action if `handle` is still the live one. Stale
    /// handles yield nothing.
    pub fn fire(&mut self, handle: DebounceHandle) -> Option<T> {
        if self.pending_handle() != Some(handle) {
            return None;
        }
        self.pending.take().map(|pending| pending.action)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_handle(&self) -> Option<DebounceHandle> {
        self.pending.as_ref().map(|pending| pending.handle)
    }

    pub fn pending_action(&self) -> Option<&T> {
        self.pending.as_ref().map(|pending| &pending.action)
    }

    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending.as_ref().map(|pending| pending.delay)
    }
}
