use crate::message_priority::MessagePriority;

#[cfg(test)]
mod tests;

/// 64-bit tagged message id.
///
/// The upper bits carry the message category (request, response, answered),
/// the priority class and the flow-controlled marker; the remaining bits hold
/// the per-actor request sequence. The all-zero id denotes an asynchronous
/// message that expects no response.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
  /// Marks a request expecting a response.
  pub const REQUEST_FLAG: u64 = 1 << 63;
  /// Marks a response to an earlier request.
  pub const RESPONSE_FLAG: u64 = 1 << 62;
  /// Marks a request that has already been answered.
  pub const ANSWERED_FLAG: u64 = 1 << 61;
  /// Marks high-priority traffic.
  pub const HIGH_PRIORITY_FLAG: u64 = 1 << 60;
  /// Marks envelopes subject to credit-based flow control.
  pub const FLOW_CONTROLLED_FLAG: u64 = 1 << 59;
  /// Mask selecting the request sequence number.
  pub const SEQUENCE_MASK: u64 = (1 << 59) - 1;

  /// Returns the id of an asynchronous message.
  #[must_use]
  pub const fn asynchronous() -> Self {
    Self(0)
  }

  /// Returns a request id carrying the given sequence number.
  #[must_use]
  pub const fn request(sequence: u64) -> Self {
    Self(Self::REQUEST_FLAG | (sequence & Self::SEQUENCE_MASK))
  }

  /// Reconstructs an id from its integer value.
  #[must_use]
  pub const fn from_value(value: u64) -> Self {
    Self(value)
  }

  /// Returns the integer value of the id.
  #[must_use]
  pub const fn value(self) -> u64 {
    self.0
  }

  /// Returns `true` for any id other than the plain asynchronous one.
  #[must_use]
  pub const fn is_valid(self) -> bool {
    self.0 != 0
  }

  /// Returns `true` when the id marks a request.
  #[must_use]
  pub const fn is_request(self) -> bool {
    self.0 & Self::REQUEST_FLAG != 0
  }

  /// Returns `true` when the id marks a response.
  #[must_use]
  pub const fn is_response(self) -> bool {
    self.0 & Self::RESPONSE_FLAG != 0
  }

  /// Returns `true` when the request has already been answered.
  #[must_use]
  pub const fn is_answered(self) -> bool {
    self.0 & Self::ANSWERED_FLAG != 0
  }

  /// Returns `true` for asynchronous ids (neither request nor response).
  #[must_use]
  pub const fn is_async(self) -> bool {
    !self.is_request() && !self.is_response()
  }

  /// Returns `true` for high-priority traffic.
  #[must_use]
  pub const fn is_high_priority(self) -> bool {
    self.0 & Self::HIGH_PRIORITY_FLAG != 0
  }

  /// Returns `true` for flow-controlled traffic.
  #[must_use]
  pub const fn is_flow_controlled(self) -> bool {
    self.0 & Self::FLOW_CONTROLLED_FLAG != 0
  }

  /// Returns the same id with the high-priority bit set.
  #[must_use]
  pub const fn with_high_priority(self) -> Self {
    Self(self.0 | Self::HIGH_PRIORITY_FLAG)
  }

  /// Returns the same id with the high-priority bit cleared.
  #[must_use]
  pub const fn with_normal_priority(self) -> Self {
    Self(self.0 & !Self::HIGH_PRIORITY_FLAG)
  }

  /// Returns the same id with the given priority class.
  #[must_use]
  pub const fn with_priority(self, priority: MessagePriority) -> Self {
    match priority {
      | MessagePriority::Normal => self.with_normal_priority(),
      | MessagePriority::High => self.with_high_priority(),
    }
  }

  /// Returns the same id with the flow-controlled bit set.
  #[must_use]
  pub const fn with_flow_control(self) -> Self {
    Self(self.0 | Self::FLOW_CONTROLLED_FLAG)
  }

  /// Returns the same id with the answered bit set.
  #[must_use]
  pub const fn mark_answered(self) -> Self {
    Self(self.0 | Self::ANSWERED_FLAG)
  }

  /// Returns the response id matching this request.
  ///
  /// Response ids map to themselves, asynchronous ids to the invalid id.
  #[must_use]
  pub const fn response_id(self) -> Self {
    if self.is_request() {
      Self((self.0 & !Self::REQUEST_FLAG) | Self::RESPONSE_FLAG)
    } else if self.is_response() {
      self
    } else {
      Self::asynchronous()
    }
  }

  /// Returns the request sequence number.
  #[must_use]
  pub const fn sequence(self) -> u64 {
    self.0 & Self::SEQUENCE_MASK
  }
}

impl core::fmt::Debug for MessageId {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("MessageId")
      .field("sequence", &self.sequence())
      .field("request", &self.is_request())
      .field("response", &self.is_response())
      .field("high_priority", &self.is_high_priority())
      .field("flow_controlled", &self.is_flow_controlled())
      .finish()
  }
}
