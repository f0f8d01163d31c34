use crate::actor_ref::ActorRef;

/// Reply to a `(sys, get, "info")` request.
#[derive(Clone, Debug)]
pub struct InfoResponse {
  key: String,
  handle: ActorRef,
  name: String,
}

impl InfoResponse {
  pub(crate) const fn new(key: String, handle: ActorRef, name: String) -> Self {
    Self { key, handle, name }
  }

  /// Returns the queried key.
  #[must_use]
  pub fn key(&self) -> &str {
    &self.key
  }

  /// Returns a strong handle to the answering actor.
  #[must_use]
  pub const fn handle(&self) -> &ActorRef {
    &self.handle
  }

  /// Returns the actor's name.
  #[must_use]
  pub fn name(&self) -> &str {
    &self.name
  }
}
