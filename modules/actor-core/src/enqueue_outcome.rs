use crate::envelope::Envelope;

/// Result of pushing an envelope into a [`crate::mailbox::Mailbox`].
#[derive(Debug)]
pub enum EnqueueOutcome {
  /// The reader is already running; nothing else to do.
  Success,
  /// The mailbox transitioned from blocked to runnable; the caller must
  /// reschedule the actor.
  UnblockedReader,
  /// The mailbox is closed. Ownership of the envelope returns to the caller,
  /// which must bounce it when the id marks a request.
  QueueClosed(Envelope),
}
