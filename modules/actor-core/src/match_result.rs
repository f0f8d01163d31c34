use crate::{any_message::AnyMessage, error::Error};

/// Outcome of applying a behavior to a message.
#[derive(Debug)]
pub enum MatchResult {
  /// The message was handled and produced no response.
  Consumed,
  /// The message was handled and produced a response message.
  ///
  /// For flow-controlled envelopes an empty response grants one credit back
  /// to the source instead of being delivered.
  Response(AnyMessage),
  /// The message was handled by failing; the error is delivered through the
  /// pending response promise if one exists.
  Fail(Error),
  /// The behavior does not handle this message.
  NoMatch,
  /// The message should be put aside and retried after a behavior change.
  Skip,
}
