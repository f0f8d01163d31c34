/// Verdict returned by [`crate::resumable::Resumable::resume`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumeResult {
  /// The actor finished execution and released its resources.
  Done,
  /// The throughput budget ran out while work remains; reschedule.
  ResumeLater,
  /// The mailbox is empty and blocked; the next enqueue reschedules.
  AwaitingMessage,
  /// The hosting execution unit is shutting down.
  Shutdown,
}
