use core::time::Duration;

use super::{ActorCell, CellState};
use crate::{
  actor_context::ActorContext,
  behavior::Behavior,
  envelope::Envelope,
  execution_unit::ExecutionUnit,
  message_id::MessageId,
  message_priority::MessagePriority,
  payload::Payload,
  timeout_msg::TimeoutMsg,
};

impl ActorCell {
  pub(crate) fn new_request_id(state: &mut CellState, priority: MessagePriority) -> MessageId {
    state.last_request_id += 1;
    MessageId::request(state.last_request_id).with_priority(priority)
  }

  pub(crate) fn find_awaited_response(state: &CellState, mid: MessageId) -> Option<Behavior> {
    state.awaited_responses.iter().find(|(id, _)| *id == mid).map(|(_, behavior)| behavior.clone())
  }

  pub(crate) fn mark_awaited_arrived(state: &mut CellState, mid: MessageId) {
    state.awaited_responses.retain(|(id, _)| *id != mid);
  }

  /// Installs a sync-style response handler; the most recent installation is
  /// serviced first.
  pub(crate) fn set_awaited_response_handler(state: &mut CellState, response_id: MessageId, behavior: Behavior) {
    if let Some(entry) = state.awaited_responses.iter_mut().find(|(id, _)| *id == response_id) {
      entry.1 = behavior;
      return;
    }
    state.awaited_responses.insert(0, (response_id, behavior));
  }

  /// Installs an async response handler and arms its sync timeout when the
  /// behavior carries one.
  pub(crate) fn set_multiplexed_response_handler(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    response_id: MessageId,
    behavior: Behavior,
  ) {
    if let Some(timeout) = behavior.timeout() {
      self.request_sync_timeout(eu, response_id, timeout);
    }
    state.multiplexed_responses.insert(response_id, behavior);
  }

  /// Arms a new behavior timeout, invalidating every previously issued one.
  ///
  /// The id is bumped twice: once for the caller-visible value and once for
  /// the id embedded in the message, which also becomes the active id.
  pub(crate) fn request_timeout(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>, timeout: Option<Duration>) -> u32 {
    let Some(timeout) = timeout else {
      state.has_timeout = false;
      return 0;
    };
    state.has_timeout = true;
    state.timeout_id = state.timeout_id.wrapping_add(1);
    let result = state.timeout_id;
    state.timeout_id = state.timeout_id.wrapping_add(1);
    let message_id = state.timeout_id;
    let Some(me) = self.strong_ref() else {
      return result;
    };
    let envelope = Envelope::make(
      None,
      MessageId::asynchronous(),
      Vec::new(),
      Payload::Timeout(TimeoutMsg { timeout_id: message_id }),
    );
    if timeout.is_zero() {
      me.enqueue(envelope, eu);
    } else {
      self.system().scheduler().delayed_send(timeout, me, envelope);
    }
    result
  }

  /// Schedules the fabricated `request_timeout` error for a sync-style
  /// request, delivered under the request's response id.
  pub(crate) fn request_sync_timeout(&self, _eu: Option<&dyn ExecutionUnit>, response_id: MessageId, timeout: Duration) {
    let Some(me) = self.strong_ref() else {
      return;
    };
    let envelope = Envelope::make(Some(me.clone()), response_id, Vec::new(), Payload::SyncTimeout);
    self.system().scheduler().delayed_send(timeout, me, envelope);
  }

  pub(crate) fn handle_timeout(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    behavior: Option<Behavior>,
    timeout_id: u32,
  ) {
    if !Self::is_active_timeout(state, timeout_id) {
      return;
    }
    let Some(behavior) = behavior else {
      return;
    };
    let mut ctx = ActorContext::new(self, state, eu);
    behavior.handle_timeout(&mut ctx);
  }

  pub(crate) fn is_active_timeout(state: &CellState, timeout_id: u32) -> bool {
    state.has_timeout && state.timeout_id == timeout_id
  }
}
