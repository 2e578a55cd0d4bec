use async_lock::{Mutex, MutexGuard};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, trace};

const NO_OWNER: u64 = 0;

/// A per-thread token, never `NO_OWNER`.
fn current_thread() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static TOKEN: u64 = NEXT.fetch_add(1, Ordering::Relaxed);
    }
    TOKEN.with(|token| *token)
}

/// An exclusive lock around a single value, accessed only inside closures.
///
/// Four access paths:
///
/// | | blocks | detects reentrancy |
/// |---|---|---|
/// | [`with_lock`](Self::with_lock) | yes | yes |
/// | [`with_lock_unchecked`](Self::with_lock_unchecked) | yes | no |
/// | [`with_lock_if_available`](Self::with_lock_if_available) | no | yes |
/// | [`with_lock_if_available_unchecked`](Self::with_lock_if_available_unchecked) | no | no |
///
/// Reentrancy detection needs the lock to be built with [`new`](Self::new),
/// which records the holding thread on every checked acquisition. A lock built
/// with [`new_unchecked`](Self::new_unchecked) skips that bookkeeping entirely and
/// its checked paths behave like the unchecked ones.
///
/// Acquiring a lock the current thread already holds through a checked path
/// panics. Through a blocking unchecked path it deadlocks.
pub struct UnfairLock<T> {
    owner: AtomicU64,
    tracked: bool,
    state: Mutex<T>,
}

/// Clears the recorded owner before the mutex guard is released, including on unwind.
struct Ownership<'a> {
    owner: Option<&'a AtomicU64>,
}

impl Drop for Ownership<'_> {
    fn drop(&mut self) {
        if let Some(owner) = self.owner {
            owner.store(NO_OWNER, Ordering::Relaxed);
        }
    }
}

impl<T> UnfairLock<T> {
    /// Create a lock that detects reentrant acquisition on its checked paths.
    pub fn new(initial: T) -> Self {
        Self {
            owner: AtomicU64::new(NO_OWNER),
            tracked: true,
            state: Mutex::new(initial),
        }
    }

    /// Create a lock without reentrancy bookkeeping.
    pub fn new_unchecked(initial: T) -> Self {
        Self {
            owner: AtomicU64::new(NO_OWNER),
            tracked: false,
            state: Mutex::new(initial),
        }
    }

    /// Whether this lock was built with [`new`](Self::new).
    pub fn is_checked(&self) -> bool {
        self.tracked
    }

    /// Block until the lock is acquired, then run `body` on the value.
    ///
    /// # Panics
    ///
    /// If the current thread already holds the lock through a checked path.
    pub fn with_lock<R>(&self, body: impl FnOnce(&mut T) -> R) -> R {
        self.assert_not_owner();
        let mut guard = self.state.lock_blocking();
        let _ownership = self.claim();
        body(&mut guard)
    }

    /// Block until the lock is acquired, then run `body` on the value.
    ///
    /// Reentrant use deadlocks.
    pub fn with_lock_unchecked<R>(&self, body: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.state.lock_blocking();
        body(&mut guard)
    }

    /// Run `body` on the value if the lock can be acquired without waiting.
    ///
    /// Returns `None`, without running `body`, when the lock is held.
    ///
    /// # Panics
    ///
    /// If the current thread already holds the lock through a checked path.
    pub fn with_lock_if_available<R>(&self, body: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.assert_not_owner();
        let mut guard = self.try_acquire()?;
        let _ownership = self.claim();
        Some(body(&mut guard))
    }

    /// Run `body` on the value if the lock can be acquired without waiting.
    ///
    /// Returns `None`, without running `body`, when the lock is held, including
    /// by the current thread.
    pub fn with_lock_if_available_unchecked<R>(
        &self,
        body: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let mut guard = self.try_acquire()?;
        Some(body(&mut guard))
    }

    /// Consume the lock and return the value.
    pub fn into_inner(self) -> T {
        self.state.into_inner()
    }

    fn try_acquire(&self) -> Option<MutexGuard<'_, T>> {
        let guard = self.state.try_lock();
        if guard.is_none() {
            trace!(target: "synchronized::lock", "lock unavailable, not waiting");
        }
        guard
    }

    fn assert_not_owner(&self) {
        if self.tracked && self.owner.load(Ordering::Relaxed) == current_thread() {
            error!(
                target: "synchronized::lock",
                "reentrant acquisition of a checked UnfairLock"
            );
            panic!("UnfairLock: reentrant acquisition by the thread that holds it");
        }
    }

    fn claim(&self) -> Ownership<'_> {
        if !self.tracked {
            return Ownership { owner: None };
        }
        self.owner.store(current_thread(), Ordering::Relaxed);
        Ownership {
            owner: Some(&self.owner),
        }
    }
}

impl<T: Default> Default for UnfairLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for UnfairLock<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for UnfairLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("UnfairLock");
        s.field("checked", &self.tracked);
        match self.state.try_lock() {
            Some(guard) => s.field("state", &*guard),
            None => s.field("state", &format_args!("<locked>")),
        };
        s.finish()
    }
}
