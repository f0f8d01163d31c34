use crate::{actor_addr::ActorAddr, actor_ref::ActorRef};

/// Handle to an open flow-controlled stream.
#[derive(Clone, Debug)]
pub struct StreamHandle {
  source: Option<ActorAddr>,
  sink: Option<ActorRef>,
}

impl StreamHandle {
  pub(crate) const fn new(source: ActorAddr, sink: ActorRef) -> Self {
    Self { source: Some(source), sink: Some(sink) }
  }

  pub(crate) const fn invalid() -> Self {
    Self { source: None, sink: None }
  }

  /// Returns `true` when the handle refers to an open stream.
  #[must_use]
  pub const fn is_valid(&self) -> bool {
    self.sink.is_some()
  }

  /// Returns the producing actor's address.
  #[must_use]
  pub const fn source(&self) -> Option<&ActorAddr> {
    self.source.as_ref()
  }

  /// Returns the consuming actor.
  #[must_use]
  pub const fn sink(&self) -> Option<&ActorRef> {
    self.sink.as_ref()
  }
}
