use crate::{actor_addr::ActorAddr, error::Error, execution_unit::ExecutionUnit};

pub(crate) type AttachmentFn = Box<dyn FnOnce(&Error, Option<&dyn ExecutionUnit>) + Send>;

/// Observer hooks fired when the owning actor cleans up.
pub(crate) enum Attachment {
  /// Delivers a down message to the observer.
  Monitor(ActorAddr),
  /// Delivers an exit message to the linked peer.
  Link(ActorAddr),
  /// Runs an arbitrary one-shot callback with the fail state.
  Functor(AttachmentFn),
}

impl Attachment {
  pub(crate) fn matches_monitor(&self, observer: &ActorAddr) -> bool {
    matches!(self, Self::Monitor(addr) if addr == observer)
  }

  pub(crate) fn matches_link(&self, peer: &ActorAddr) -> bool {
    matches!(self, Self::Link(addr) if addr == peer)
  }
}
