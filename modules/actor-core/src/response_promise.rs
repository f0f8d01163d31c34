use crate::{
  actor_ref::ActorRef, any_message::AnyMessage, envelope::Envelope, error::Error, execution_unit::ExecutionUnit,
  message_id::MessageId, payload::Payload,
};

/// Handle for answering a request after the handler returned.
///
/// Delivery walks the staged forwarding list first; once no stage remains the
/// response goes to the original sender under the request's response id.
/// Empty responses to asynchronous messages are suppressed.
#[derive(Debug)]
pub struct ResponsePromise {
  self_ref: Option<ActorRef>,
  sender: Option<ActorRef>,
  stages: Vec<ActorRef>,
  mid: MessageId,
}

impl ResponsePromise {
  pub(crate) fn new(self_ref: Option<ActorRef>, envelope: &mut Envelope) -> Self {
    Self {
      self_ref,
      sender: envelope.sender().cloned(),
      stages: envelope.take_stages(),
      mid: envelope.mid(),
    }
  }

  pub(crate) const fn invalid() -> Self {
    Self { self_ref: None, sender: None, stages: Vec::new(), mid: MessageId::asynchronous() }
  }

  /// Returns `true` while a receiver for the response exists.
  #[must_use]
  pub fn pending(&self) -> bool {
    self.sender.is_some() || !self.stages.is_empty()
  }

  /// Returns `true` when the underlying message expects no response.
  #[must_use]
  pub const fn is_async(&self) -> bool {
    self.mid.is_async()
  }

  /// Delivers a response message.
  pub fn deliver(self, message: AnyMessage, eu: Option<&dyn ExecutionUnit>) {
    if message.is_unit() && self.is_async() {
      return;
    }
    self.deliver_payload(Payload::User(message), eu);
  }

  /// Delivers an error instead of a response message.
  pub fn deliver_error(self, error: Error, eu: Option<&dyn ExecutionUnit>) {
    self.deliver_payload(Payload::Fail(error), eu);
  }

  fn deliver_payload(mut self, payload: Payload, eu: Option<&dyn ExecutionUnit>) {
    if let Some(next) = self.stages.pop() {
      let envelope = Envelope::make(self.sender.take(), self.mid, core::mem::take(&mut self.stages), payload);
      next.enqueue(envelope, eu);
      return;
    }
    let Some(sender) = self.sender.take() else {
      return;
    };
    let envelope = Envelope::make(self.self_ref.take(), self.mid.response_id(), Vec::new(), payload);
    sender.enqueue(envelope, eu);
  }
}
