use std::sync::atomic::{AtomicBool, Ordering};

/// Single-permit, non-blocking semaphore. A caller that misses the permit
/// is turned away immediately; attempts are dropped, never queued. The
/// permit releases itself on drop, so every exit path gives it back.
pub struct TrySemaphore {
    busy: AtomicBool,
}

impl Default for TrySemaphore {
    fn default() -> Self {
        Self::new()
    }
}

impl TrySemaphore {
    pub fn new() -> TrySemaphore {
        TrySemaphore {
            busy: AtomicBool::new(false),
        }
    }

    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(Permit { semaphore: self })
        } else {
            None
        }
    }
}

pub struct Permit<'a> {
    semaphore: &'a TrySemaphore,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.semaphore.busy.store(false, Ordering::Release);
    }
}
