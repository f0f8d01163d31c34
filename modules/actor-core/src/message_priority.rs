/// Priority class attached to a message id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MessagePriority {
  /// Regular traffic, delivered in arrival order.
  #[default]
  Normal,
  /// Overtakes normal traffic within a single mailbox pull cycle.
  High,
}
