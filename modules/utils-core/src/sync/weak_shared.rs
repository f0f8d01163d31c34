use std::sync::Weak;

use super::arc_shared::ArcShared;

/// Weak counterpart of [`ArcShared`].
///
/// Upgrading yields `None` once every strong handle has been dropped, which
/// the runtime uses to detect dead peers without keeping them alive.
#[repr(transparent)]
pub struct WeakShared<T: ?Sized>(Weak<T>);

impl<T> WeakShared<T> {
  /// Creates a weak handle that never upgrades.
  #[must_use]
  pub const fn new() -> Self {
    Self(Weak::new())
  }
}

impl<T: ?Sized> WeakShared<T> {
  pub(crate) const fn from_weak(weak: Weak<T>) -> Self {
    Self(weak)
  }

  /// Attempts to obtain a strong handle to the allocation.
  #[must_use]
  pub fn upgrade(&self) -> Option<ArcShared<T>> {
    self.0.upgrade().map(ArcShared::from_arc)
  }

  /// Returns `true` when both handles point at the same allocation.
  #[must_use]
  pub fn ptr_eq(&self, other: &Self) -> bool {
    Weak::ptr_eq(&self.0, &other.0)
  }
}

impl<T> Default for WeakShared<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ?Sized> Clone for WeakShared<T> {
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<T: ?Sized> core::fmt::Debug for WeakShared<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("WeakShared").finish()
  }
}
