//! Lock-guarded struct properties with checked, unchecked and non-blocking access.
//!
//! Declare structs inside [`synchronized!`] and mark properties with
//! `#[locked(Kind)]`. Each marked property is stored in a private
//! [`UnfairLock`] and read and written only through generated accessors that
//! acquire it.
//!
//! # Quick Start
//!
//! ```rust
//! synchronized::synchronized! {
//!     pub struct Counter {
//!         #[locked(Checked)]
//!         pub let mut hits: u64 = 0;
//!         #[locked(Unchecked)]
//!         pub let mut label: String;
//!     }
//! }
//!
//! let counter = Counter::new("requests".to_owned());
//! counter.set_hits(counter.hits() + 1);
//! assert_eq!(counter.hits(), 1);
//! assert_eq!(counter.label(), "requests");
//! ```
//!
//! # Lock kinds
//!
//! | Kind | Acquisition | Reentrant use on one thread |
//! |------|-------------|-----------------------------|
//! | `Checked` | blocking | panics |
//! | `Unchecked` | blocking | deadlocks |
//! | `CheckedOptional` | non-blocking | panics |
//! | `UncheckedOptional` | non-blocking | lock reported unavailable |
//!
//! The `*Optional` kinds never wait, so their property must be an `Option`. The
//! plain getter returns `None` and the plain setter drops the write when the
//! lock is held elsewhere. `try_*` accessors report the same condition as
//! [`LockedError::LockUnavailable`]:
//!
//! ```rust
//! synchronized::synchronized! {
//!     struct Cache {
//!         #[locked(CheckedOptional)]
//!         let mut last: Option<u64> = None;
//!     }
//! }
//!
//! let cache = Cache::default();
//! cache.try_set_last(Some(7)).unwrap();
//! assert_eq!(cache.last(), Some(7));
//! assert_eq!(cache.try_last(), Ok(Some(7)));
//! ```
//!
//! # Generated items
//!
//! For a property `let mut x: T` the macro generates:
//!
//! | Item | Purpose |
//! |------|---------|
//! | `_x: UnfairLock<T>` | Private backing field |
//! | `fn x(&self) -> T` | Clone of the value, read under the lock |
//! | `fn set_x(&self, T)` | Replace the value under the lock |
//! | `fn try_x` / `fn try_set_x` | `*Optional` kinds only, return `Result<_, LockedError>` |
//!
//! `new` takes the plain fields and every property without an initializer, in
//! declaration order. When it takes nothing, `Default` is implemented too.
//!
//! # Convention
//!
//! By default the lock kind must be spelled out. With the `implicit-checked`
//! feature a bare `#[locked]` means `Checked` and arguments are rejected.

mod error;
mod lock;

pub use error::LockedError;
pub use lock::UnfairLock;
pub use synchronized_derive::synchronized;
