use troupe_utils_core_rs::sync::WeakShared;

use crate::{actor_cell::ActorCell, actor_ref::ActorRef};

/// Weak actor handle carrying the actor's identity.
///
/// Addresses never keep an actor alive; upgrading fails once every strong
/// handle is gone, which the credit ledger uses to detect dead sources.
pub struct ActorAddr {
  id: u64,
  cell: WeakShared<ActorCell>,
}

impl ActorAddr {
  pub(crate) const fn new(id: u64, cell: WeakShared<ActorCell>) -> Self {
    Self { id, cell }
  }

  /// Returns the actor id.
  #[must_use]
  pub const fn id(&self) -> u64 {
    self.id
  }

  /// Attempts to obtain a strong handle.
  #[must_use]
  pub fn upgrade(&self) -> Option<ActorRef> {
    self.cell.upgrade().map(ActorRef::from_cell)
  }
}

impl Clone for ActorAddr {
  fn clone(&self) -> Self {
    Self { id: self.id, cell: self.cell.clone() }
  }
}

impl PartialEq for ActorAddr {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for ActorAddr {}

impl core::hash::Hash for ActorAddr {
  fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl core::fmt::Debug for ActorAddr {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ActorAddr").field("id", &self.id).finish()
  }
}
