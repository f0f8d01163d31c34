use troupe_utils_core_rs::sync::{ArcShared, SpinSyncMutex, WeakShared};

use crate::actor_cell::ActorCell;

struct GroupState {
  name: String,
  members: SpinSyncMutex<Vec<(u64, WeakShared<ActorCell>)>>,
}

/// Named set of subscribed actors.
///
/// The core only needs join/leave semantics: membership is tracked weakly and
/// an actor's cleanup unsubscribes it from every joined group.
pub struct Group {
  state: ArcShared<GroupState>,
}

impl Group {
  /// Creates a new group.
  #[must_use]
  pub fn new(name: impl Into<String>) -> Self {
    Self { state: ArcShared::new(GroupState { name: name.into(), members: SpinSyncMutex::new(Vec::new()) }) }
  }

  /// Returns the group name.
  #[must_use]
  pub fn name(&self) -> String {
    self.state.name.clone()
  }

  /// Returns the number of live subscriptions.
  #[must_use]
  pub fn len(&self) -> usize {
    self.state.members.lock().iter().filter(|(_, cell)| cell.upgrade().is_some()).count()
  }

  /// Returns `true` when no live subscription remains.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Subscribes an actor; returns `false` when it was already a member.
  pub(crate) fn subscribe(&self, cell: &ArcShared<ActorCell>) -> bool {
    let mut members = self.state.members.lock();
    if members.iter().any(|(id, _)| *id == cell.id()) {
      return false;
    }
    members.push((cell.id(), cell.downgrade()));
    true
  }

  /// Removes an actor from the member list.
  pub(crate) fn unsubscribe(&self, id: u64) {
    self.state.members.lock().retain(|(member, _)| *member != id);
  }
}

impl Clone for Group {
  fn clone(&self) -> Self {
    Self { state: self.state.clone() }
  }
}

impl PartialEq for Group {
  fn eq(&self, other: &Self) -> bool {
    self.state.ptr_eq(&other.state)
  }
}

impl Eq for Group {}

impl core::fmt::Debug for Group {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Group").field("name", &self.state.name).finish()
  }
}
