//! Mutex abstraction shared by the runtime crates.

mod spin_sync_mutex;

pub use spin_sync_mutex::SpinSyncMutex;

/// Minimal mutex contract the runtime depends on.
pub trait SyncMutexLike<T> {
  /// Guard type returned by [`SyncMutexLike::lock`].
  type Guard<'a>: core::ops::DerefMut<Target = T>
  where
    T: 'a,
    Self: 'a;

  /// Creates a new mutex-protected value.
  fn new(value: T) -> Self;

  /// Consumes the mutex and returns the underlying value.
  fn into_inner(self) -> T;

  /// Locks the mutex and returns a guard to the protected value.
  fn lock(&self) -> Self::Guard<'_>;
}
