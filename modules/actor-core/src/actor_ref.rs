use troupe_utils_core_rs::sync::ArcShared;

use crate::{
  actor_addr::ActorAddr, actor_cell::ActorCell, any_message::AnyMessage, envelope::Envelope,
  execution_unit::ExecutionUnit, message_id::MessageId, payload::Payload,
};

/// Strong actor handle.
///
/// Keeps the actor's cell alive and is the only way to enqueue messages from
/// outside the actor.
pub struct ActorRef {
  cell: ArcShared<ActorCell>,
}

impl ActorRef {
  pub(crate) const fn from_cell(cell: ArcShared<ActorCell>) -> Self {
    Self { cell }
  }

  pub(crate) fn cell(&self) -> &ArcShared<ActorCell> {
    &self.cell
  }

  /// Returns the actor id.
  #[must_use]
  pub fn id(&self) -> u64 {
    self.cell.id()
  }

  /// Returns the actor's name.
  #[must_use]
  pub fn name(&self) -> String {
    self.cell.name().to_string()
  }

  /// Returns the weak address of this actor.
  #[must_use]
  pub fn addr(&self) -> ActorAddr {
    self.cell.addr()
  }

  /// Returns `true` once the actor has terminated and cleaned up.
  #[must_use]
  pub fn is_cleaned_up(&self) -> bool {
    self.cell.is_cleaned_up()
  }

  /// Returns the actor's current fail state.
  #[must_use]
  pub fn fail_state(&self) -> crate::error::Error {
    self.cell.fail_state()
  }

  /// Sends an anonymous asynchronous user message.
  pub fn tell(&self, message: AnyMessage) {
    self.enqueue(Envelope::make(None, MessageId::asynchronous(), Vec::new(), Payload::User(message)), None);
  }

  /// Sends an anonymous asynchronous payload.
  pub fn tell_payload(&self, payload: Payload) {
    self.tell_payload_with_eu(payload, None);
  }

  pub(crate) fn tell_payload_with_eu(&self, payload: Payload, eu: Option<&dyn ExecutionUnit>) {
    self.enqueue(Envelope::make(None, MessageId::asynchronous(), Vec::new(), payload), eu);
  }

  /// Pushes an envelope into the actor's mailbox, rescheduling it if needed.
  pub fn enqueue(&self, envelope: Envelope, eu: Option<&dyn ExecutionUnit>) {
    ActorCell::enqueue(&self.cell, envelope, eu);
  }
}

impl Clone for ActorRef {
  fn clone(&self) -> Self {
    Self { cell: self.cell.clone() }
  }
}

impl PartialEq for ActorRef {
  fn eq(&self, other: &Self) -> bool {
    self.cell.ptr_eq(&other.cell)
  }
}

impl Eq for ActorRef {}

impl core::hash::Hash for ActorRef {
  fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
    self.id().hash(state);
  }
}

impl core::fmt::Debug for ActorRef {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ActorRef").field("id", &self.id()).finish()
  }
}
