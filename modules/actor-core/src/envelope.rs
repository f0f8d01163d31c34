use crate::{actor_ref::ActorRef, message_id::MessageId, payload::Payload};

/// A queued message together with its delivery metadata.
#[derive(Debug)]
pub struct Envelope {
  sender: Option<ActorRef>,
  mid: MessageId,
  stages: Vec<ActorRef>,
  payload: Payload,
}

impl Envelope {
  /// Creates a new envelope.
  #[must_use]
  pub const fn make(sender: Option<ActorRef>, mid: MessageId, stages: Vec<ActorRef>, payload: Payload) -> Self {
    Self { sender, mid, stages, payload }
  }

  /// Returns the sending actor, if the message was not sent anonymously.
  #[must_use]
  pub const fn sender(&self) -> Option<&ActorRef> {
    self.sender.as_ref()
  }

  /// Returns the message id.
  #[must_use]
  pub const fn mid(&self) -> MessageId {
    self.mid
  }

  /// Replaces the message id, e.g. when a delegate changes the priority.
  pub fn set_mid(&mut self, mid: MessageId) {
    self.mid = mid;
  }

  /// Returns the staged forwarding list.
  #[must_use]
  pub fn stages(&self) -> &[ActorRef] {
    &self.stages
  }

  /// Moves the staged forwarding list out of the envelope.
  pub fn take_stages(&mut self) -> Vec<ActorRef> {
    core::mem::take(&mut self.stages)
  }

  /// Returns the message content.
  #[must_use]
  pub const fn payload(&self) -> &Payload {
    &self.payload
  }

  /// Returns the message content mutably.
  pub fn payload_mut(&mut self) -> &mut Payload {
    &mut self.payload
  }

  /// Swaps the message content, returning the previous payload.
  pub fn replace_payload(&mut self, payload: Payload) -> Payload {
    core::mem::replace(&mut self.payload, payload)
  }

  /// Returns `true` when the envelope carries high-priority traffic.
  #[must_use]
  pub const fn is_high_priority(&self) -> bool {
    self.mid.is_high_priority()
  }
}
