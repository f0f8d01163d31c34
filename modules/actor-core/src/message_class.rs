/// Classification of an incoming envelope prior to handler dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageClass {
  /// An obsolete timeout delivery.
  ExpiredTimeout,
  /// Triggers the currently active timeout.
  Timeout,
  /// An asynchronous message or request.
  Ordinary,
  /// A response to an earlier request.
  Response,
  /// A system message handled entirely by the filter.
  System,
}
