/// Flags controlling how an actor is launched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnOptions {
  detached: bool,
  lazy: bool,
  hidden: bool,
  priority_aware: bool,
}

impl SpawnOptions {
  /// Returns the default option set: scheduled, eager, registered.
  #[must_use]
  pub const fn new() -> Self {
    Self { detached: false, lazy: false, hidden: false, priority_aware: false }
  }

  /// Runs the actor on its own thread instead of a scheduler worker.
  #[must_use]
  pub const fn detached(mut self) -> Self {
    self.detached = true;
    self
  }

  /// Defers scheduling until the first message arrives.
  #[must_use]
  pub const fn lazy_init(mut self) -> Self {
    self.lazy = true;
    self
  }

  /// Keeps the actor out of the system registry.
  #[must_use]
  pub const fn hidden(mut self) -> Self {
    self.hidden = true;
    self
  }

  /// Reorders each mailbox pull cycle so high-priority envelopes go first.
  #[must_use]
  pub const fn priority_aware(mut self) -> Self {
    self.priority_aware = true;
    self
  }

  /// Returns `true` when the actor runs on its own thread.
  #[must_use]
  pub const fn is_detached(&self) -> bool {
    self.detached
  }

  /// Returns `true` when scheduling is deferred to the first enqueue.
  #[must_use]
  pub const fn is_lazy(&self) -> bool {
    self.lazy
  }

  /// Returns `true` when the actor stays out of the registry.
  #[must_use]
  pub const fn is_hidden(&self) -> bool {
    self.hidden
  }

  /// Returns `true` when priority reassembly is enabled.
  #[must_use]
  pub const fn is_priority_aware(&self) -> bool {
    self.priority_aware
  }
}
