use core::any::Any;

use troupe_utils_core_rs::sync::{ArcShared, SpinSyncMutex};

use crate::{
  actor_cell::{ActorCell, CellState},
  actor_ref::ActorRef,
  actor_system::ActorSystem,
  any_message::AnyMessage,
  attachment::Attachment,
  behavior::Behavior,
  envelope::Envelope,
  error::Error,
  execution_unit::ExecutionUnit,
  exit_msg::ExitMsg,
  group::Group,
  match_result::MatchResult,
  message_id::MessageId,
  message_priority::MessagePriority,
  payload::Payload,
  response_promise::ResponsePromise,
  stream_handle::StreamHandle,
  sys_message::SysMessage,
};

/// View of the running actor handed to behaviors and lifecycle hooks.
///
/// All user-facing operations live here: sending, requesting, responding,
/// delegating, behavior changes, monitoring, grouping and stream creation.
/// The context only exists while the dispatch engine holds the reader role,
/// so every mutation stays serialized.
pub struct ActorContext<'a> {
  cell: &'a ActorCell,
  state: &'a mut CellState,
  eu: Option<&'a dyn ExecutionUnit>,
}

impl<'a> ActorContext<'a> {
  pub(crate) fn new(cell: &'a ActorCell, state: &'a mut CellState, eu: Option<&'a dyn ExecutionUnit>) -> Self {
    Self { cell, state, eu }
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

  /// Returns the hosting system.
  #[must_use]
  pub fn system(&self) -> &ActorSystem {
    self.cell.system()
  }

  /// Returns a strong handle to this actor, if it is still alive.
  #[must_use]
  pub fn self_ref(&self) -> Option<ActorRef> {
    self.cell.strong_ref()
  }

  /// Returns the sender of the message currently being processed.
  #[must_use]
  pub fn current_sender(&self) -> Option<ActorRef> {
    self.state.current_element.as_ref().and_then(|envelope| envelope.sender().cloned())
  }

  /// Sends an asynchronous user message.
  pub fn send<T>(&mut self, target: &ActorRef, message: T)
  where
    T: Any + Send + Sync + 'static, {
    self.send_payload(target, MessagePriority::Normal, Payload::user(message));
  }

  /// Sends an asynchronous payload with the given priority.
  pub fn send_payload(&mut self, target: &ActorRef, priority: MessagePriority, payload: Payload) {
    let mid = MessageId::asynchronous().with_priority(priority);
    target.enqueue(Envelope::make(self.cell.strong_ref(), mid, Vec::new(), payload), self.eu);
  }

  /// Sends a request and installs a multiplexed response handler.
  ///
  /// The handler fires whenever the response arrives, also while the actor
  /// awaits a different response. Returns the request id.
  pub fn request_then(&mut self, target: &ActorRef, payload: Payload, handler: Behavior) -> MessageId {
    let mid = self.issue_request(target, payload, MessagePriority::Normal);
    self.cell.set_multiplexed_response_handler(self.state, self.eu, mid.response_id(), handler);
    mid
  }

  /// Sends a request and awaits its response before ordinary processing
  /// continues; later installations are serviced first.
  ///
  /// Returns the request id.
  pub fn request_await(&mut self, target: &ActorRef, payload: Payload, handler: Behavior) -> MessageId {
    let mid = self.issue_request(target, payload, MessagePriority::Normal);
    if let Some(timeout) = handler.timeout() {
      self.cell.request_sync_timeout(self.eu, mid.response_id(), timeout);
    }
    ActorCell::set_awaited_response_handler(self.state, mid.response_id(), handler);
    mid
  }

  fn issue_request(&mut self, target: &ActorRef, payload: Payload, priority: MessagePriority) -> MessageId {
    let mid = ActorCell::new_request_id(self.state, priority);
    target.enqueue(Envelope::make(self.cell.strong_ref(), mid, Vec::new(), payload), self.eu);
    mid
  }

  /// Creates a promise answering the current request later.
  pub fn make_response_promise(&mut self) -> ResponsePromise {
    self.cell.make_promise_from_current(self.state)
  }

  /// Answers the current request immediately.
  pub fn response(&mut self, message: AnyMessage) {
    let promise = self.make_response_promise();
    if promise.pending() {
      promise.deliver(message, self.eu);
    }
  }

  /// Forwards the current message to another actor.
  ///
  /// The envelope's priority is rewritten, its payload replaced, and the
  /// original sender preserved so that `dest` answers the requester directly.
  pub fn delegate(&mut self, dest: &ActorRef, priority: MessagePriority, message: AnyMessage) {
    let Some(mut envelope) = self.state.current_element.take() else {
      tracing::warn!(actor = self.cell.id(), "delegate called outside of a message handler");
      return;
    };
    envelope.set_mid(envelope.mid().with_priority(priority));
    envelope.replace_payload(Payload::User(message));
    dest.enqueue(envelope, self.eu);
  }

  /// Pushes a behavior, optionally replacing the current top of the stack.
  pub fn do_become(&mut self, behavior: Behavior, discard_old: bool) {
    self.cell.do_become(self.state, self.eu, behavior, discard_old);
  }

  /// Pops the top behavior.
  pub fn unbecome(&mut self) {
    self.state.bhvr_stack.pop_back();
  }

  /// Finishes execution after the current handler returns.
  pub fn quit(&mut self, reason: Error) {
    self.cell.quit(self.state, reason);
  }

  /// Sends an exit message to `target`.
  pub fn send_exit(&mut self, target: &ActorRef, reason: Error) {
    let exit = ExitMsg { source: self.cell.addr(), reason };
    self.send_payload(target, MessagePriority::Normal, Payload::Exit(exit));
  }

  /// Starts observing `target`; its termination delivers a down message.
  ///
  /// Each call installs a new, independent monitor.
  pub fn monitor(&mut self, target: &ActorRef) {
    target.cell().attach(Attachment::Monitor(self.cell.addr()), self.eu);
  }

  /// Removes one monitor from `target`.
  pub fn demonitor(&mut self, target: &ActorRef) {
    target.cell().detach_monitor(&self.cell.addr());
  }

  /// Links this actor to `target`; its termination delivers an exit message.
  pub fn link_to(&mut self, target: &ActorRef) {
    let addr = target.addr();
    if self.state.linked.contains(&addr) {
      return;
    }
    target.cell().attach(Attachment::Link(self.cell.addr()), self.eu);
    self.state.linked.push(addr);
  }

  /// Removes the link to `target`.
  pub fn unlink_from(&mut self, target: &ActorRef) {
    self.cell.unlink_from(self.state, &target.addr());
  }

  /// Subscribes this actor to `group` until it terminates or leaves.
  pub fn join(&mut self, group: &Group) {
    let Some(me) = self.cell.strong_ref() else {
      return;
    };
    if group.subscribe(me.cell()) {
      self.state.subscriptions.push(group.clone());
    }
  }

  /// Unsubscribes this actor from `group`.
  pub fn leave(&mut self, group: &Group) {
    group.unsubscribe(self.cell.id());
    self.state.subscriptions.retain(|subscribed| subscribed != group);
  }

  /// Opens a flow-controlled stream towards `sink`.
  ///
  /// The generator is invoked on demand; yielding `None` ends the stream.
  /// The actor stays alive while the stream is open.
  pub fn new_stream<F>(&mut self, sink: &ActorRef, mut generator: F) -> StreamHandle
  where
    F: FnMut() -> Option<AnyMessage> + Send + 'static, {
    if self.state.generators.contains_key(sink) {
      tracing::warn!(actor = self.cell.id(), sink = sink.id(), "multiple new_stream calls for the same sink");
      return StreamHandle::invalid();
    }
    let Some(me) = self.cell.strong_ref() else {
      return StreamHandle::invalid();
    };
    let keepalive = me.cell().clone();
    let producer = me.clone();
    let target = sink.clone();
    let run = Box::new(move || {
      let Some(message) = generator() else {
        return false;
      };
      let mid = MessageId::from_value(MessageId::FLOW_CONTROLLED_FLAG);
      target.enqueue(Envelope::make(Some(producer.clone()), mid, Vec::new(), Payload::User(message)), None);
      true
    });
    self.state.generators.insert(sink.clone(), crate::actor_cell::GeneratorEntry { run, _keepalive: keepalive });
    self.send_payload(sink, MessagePriority::Normal, Payload::Sys(SysMessage::AddSource));
    StreamHandle::new(me.addr(), sink.clone())
  }

  /// Replaces the handler for unmatched ordinary messages.
  pub fn set_default_handler<F>(&mut self, handler: F)
  where
    F: FnMut(&mut ActorContext<'_>, &mut Payload) -> MatchResult + Send + 'static, {
    *self.state.default_handler.lock() = Box::new(handler);
  }

  /// Replaces the handler for error messages.
  pub fn set_error_handler<F>(&mut self, handler: F)
  where
    F: FnMut(&mut ActorContext<'_>, Error) + Send + 'static, {
    *self.state.error_handler.lock() = Box::new(handler);
  }

  /// Replaces the handler for down messages.
  pub fn set_down_handler<F>(&mut self, handler: F)
  where
    F: FnMut(&mut ActorContext<'_>, crate::down_msg::DownMsg) + Send + 'static, {
    *self.state.down_handler.lock() = Box::new(handler);
  }

  /// Replaces the handler for exit messages.
  pub fn set_exit_handler<F>(&mut self, handler: F)
  where
    F: FnMut(&mut ActorContext<'_>, ExitMsg) + Send + 'static, {
    *self.state.exit_handler.lock() = Box::new(handler);
  }

  /// Installs a handler mapping a caught panic to an exit reason.
  pub fn set_exception_handler<F>(&mut self, handler: F)
  where
    F: FnMut(&(dyn Any + Send)) -> Option<Error> + Send + 'static, {
    let boxed: crate::actor_cell::ExceptionHandlerFn = Box::new(handler);
    self.state.exception_handler = Some(ArcShared::new(SpinSyncMutex::new(boxed)));
  }

  /// Installs a hook running after the actor finished execution.
  pub fn set_on_exit<F>(&mut self, hook: F)
  where
    F: FnMut(&mut ActorContext<'_>) + Send + 'static, {
    self.state.on_exit = Some(Box::new(hook));
  }

}

impl core::fmt::Debug for ActorContext<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ActorContext").field("id", &self.cell.id()).finish()
  }
}
