use crate::{envelope::Envelope, error::Error, execution_unit::ExecutionUnit, payload::Payload};

/// Answers requests that can no longer reach their target.
///
/// Applied to every envelope drained from a closing mailbox and to envelopes
/// rejected by an already closed one: requests receive a synthetic error
/// response carrying the actor's fail state, everything else is dropped.
pub(crate) struct RequestBouncer {
  reason: Error,
}

impl RequestBouncer {
  pub(crate) const fn new(reason: Error) -> Self {
    Self { reason }
  }

  pub(crate) fn bounce(&self, envelope: Envelope, eu: Option<&dyn ExecutionUnit>) {
    if !envelope.mid().is_request() {
      return;
    }
    let Some(sender) = envelope.sender() else {
      return;
    };
    let response =
      Envelope::make(None, envelope.mid().response_id(), Vec::new(), Payload::Fail(self.reason.clone()));
    sender.enqueue(response, eu);
  }
}
