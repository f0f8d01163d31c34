use std::collections::VecDeque;

use troupe_utils_core_rs::sync::SpinSyncMutex;

use crate::{enqueue_outcome::EnqueueOutcome, envelope::Envelope};

#[cfg(test)]
mod tests;

struct MailboxState {
  queue: VecDeque<Envelope>,
  blocked: bool,
  closed: bool,
}

/// Concurrent single-reader multi-writer message queue.
///
/// Writers only ever contend on the enqueue path; the reader role is handed
/// out through the blocked/unblocked state machine: `try_block` succeeds only
/// on an empty queue, and the writer that flips a blocked mailbox back to
/// runnable learns so through [`EnqueueOutcome::UnblockedReader`] and must
/// reschedule the actor.
pub struct Mailbox {
  state: SpinSyncMutex<MailboxState>,
}

impl Mailbox {
  /// Creates an open, unblocked mailbox.
  #[must_use]
  pub const fn new() -> Self {
    Self { state: SpinSyncMutex::new(MailboxState { queue: VecDeque::new(), blocked: false, closed: false }) }
  }

  /// Pushes an envelope, reporting the reader transition to the caller.
  pub fn enqueue(&self, envelope: Envelope) -> EnqueueOutcome {
    let mut state = self.state.lock();
    if state.closed {
      return EnqueueOutcome::QueueClosed(envelope);
    }
    state.queue.push_back(envelope);
    if state.blocked {
      state.blocked = false;
      EnqueueOutcome::UnblockedReader
    } else {
      EnqueueOutcome::Success
    }
  }

  /// Pops the next envelope, if any.
  #[must_use]
  pub fn try_pop(&self) -> Option<Envelope> {
    self.state.lock().queue.pop_front()
  }

  /// Returns `true` while queued envelopes remain.
  #[must_use]
  pub fn can_fetch_more(&self) -> bool {
    !self.state.lock().queue.is_empty()
  }

  /// Atomically marks the mailbox blocked when no envelope is observable.
  ///
  /// Returns `false` when an envelope arrived in the meantime or the mailbox
  /// is closed.
  pub fn try_block(&self) -> bool {
    let mut state = self.state.lock();
    if state.closed || !state.queue.is_empty() {
      return false;
    }
    state.blocked = true;
    true
  }

  /// Returns `true` once the mailbox has been closed.
  #[must_use]
  pub fn is_closed(&self) -> bool {
    self.state.lock().closed
  }

  /// Closes the mailbox and drains every queued envelope through `bouncer`.
  pub fn close<F>(&self, mut bouncer: F)
  where
    F: FnMut(Envelope), {
    let drained = {
      let mut state = self.state.lock();
      state.closed = true;
      state.blocked = false;
      core::mem::take(&mut state.queue)
    };
    for envelope in drained {
      bouncer(envelope);
    }
  }
}

impl Default for Mailbox {
  fn default() -> Self {
    Self::new()
  }
}

impl core::fmt::Debug for Mailbox {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let state = self.state.lock();
    f.debug_struct("Mailbox")
      .field("len", &state.queue.len())
      .field("blocked", &state.blocked)
      .field("closed", &state.closed)
      .finish()
  }
}
