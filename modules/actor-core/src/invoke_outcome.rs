/// Result of offering an envelope to the current behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvokeOutcome {
  /// The envelope was handled.
  Success,
  /// The envelope was not consumable right now and belongs in the cache.
  Skipped,
  /// The envelope was consumed without invoking a behavior, e.g. a system
  /// message or an expired timeout.
  Dropped,
}
