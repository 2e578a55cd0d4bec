use thiserror::Error;

/// Runtime failure of a generated `try_*` accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LockedError {
    /// A non-blocking acquisition found the lock held, so the value was not accessed.
    #[error("lock was unavailable, the value was not accessed")]
    LockUnavailable,
}
