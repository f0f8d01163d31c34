use core::time::Duration;

use troupe_utils_core_rs::sync::{ArcShared, SpinSyncMutex};

use crate::{actor_context::ActorContext, match_result::MatchResult, payload::Payload};

type HandlerFn = Box<dyn FnMut(&mut ActorContext<'_>, &mut Payload) -> MatchResult + Send>;
type TimeoutFn = Box<dyn FnMut(&mut ActorContext<'_>) + Send>;

struct BehaviorCell {
  handler: HandlerFn,
  timeout: Option<Duration>,
  on_timeout: Option<TimeoutFn>,
}

/// A message-matching function with an optional timeout.
///
/// Behaviors are cheaply cloneable handles; two clones compare equal and the
/// runtime relies on that identity when deciding whether the stack still
/// holds the behavior a timeout was armed for.
pub struct Behavior {
  cell: ArcShared<SpinSyncMutex<BehaviorCell>>,
}

impl Behavior {
  /// Creates a behavior from a message handler.
  #[must_use]
  pub fn new<F>(handler: F) -> Self
  where
    F: FnMut(&mut ActorContext<'_>, &mut Payload) -> MatchResult + Send + 'static, {
    Self { cell: ArcShared::new(SpinSyncMutex::new(BehaviorCell { handler: Box::new(handler), timeout: None, on_timeout: None })) }
  }

  /// Arms the behavior with a timeout and its callback.
  #[must_use]
  pub fn with_timeout<F>(self, timeout: Duration, on_timeout: F) -> Self
  where
    F: FnMut(&mut ActorContext<'_>) + Send + 'static, {
    {
      let mut cell = self.cell.lock();
      cell.timeout = Some(timeout);
      cell.on_timeout = Some(Box::new(on_timeout));
    }
    self
  }

  /// Returns the configured timeout, if any.
  #[must_use]
  pub fn timeout(&self) -> Option<Duration> {
    self.cell.lock().timeout
  }

  pub(crate) fn invoke(&self, ctx: &mut ActorContext<'_>, payload: &mut Payload) -> MatchResult {
    let mut cell = self.cell.lock();
    (cell.handler)(ctx, payload)
  }

  pub(crate) fn handle_timeout(&self, ctx: &mut ActorContext<'_>) {
    let mut cell = self.cell.lock();
    if let Some(on_timeout) = cell.on_timeout.as_mut() {
      on_timeout(ctx);
    }
  }
}

impl Clone for Behavior {
  fn clone(&self) -> Self {
    Self { cell: self.cell.clone() }
  }
}

impl PartialEq for Behavior {
  fn eq(&self, other: &Self) -> bool {
    self.cell.ptr_eq(&other.cell)
  }
}

impl Eq for Behavior {}

impl core::fmt::Debug for Behavior {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Behavior").field("timeout", &self.timeout()).finish()
  }
}
