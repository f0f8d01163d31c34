use super::{ActorCell, CellState};
use crate::{
  actor_addr::ActorAddr,
  actor_context::ActorContext,
  attachment::Attachment,
  behavior::Behavior,
  envelope::Envelope,
  error::Error,
  execution_unit::ExecutionUnit,
  info_response::InfoResponse,
  invoke_outcome::InvokeOutcome,
  match_result::MatchResult,
  message_class::MessageClass,
  message_id::MessageId,
  payload::Payload,
  response_promise::ResponsePromise,
  sys_message::SysMessage,
};

impl ActorCell {
  /// Classifies an envelope before handler dispatch, handling system traffic
  /// in place.
  pub(crate) fn filter_envelope(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    envelope: &mut Envelope,
  ) -> MessageClass {
    if envelope.mid().is_response() {
      return MessageClass::Response;
    }
    match envelope.payload() {
      | Payload::Sys(SysMessage::Get(key)) => {
        let key = key.clone();
        let Some(sender) = envelope.sender().cloned() else {
          tracing::warn!(actor = self.id(), "dropped ('sys', 'get', key) from anonymous sender");
          return MessageClass::System;
        };
        let reply = if key == "info" {
          match self.strong_ref() {
            | Some(handle) => Payload::user(InfoResponse::new(key, handle, self.name().to_string())),
            | None => return MessageClass::System,
          }
        } else {
          Payload::Fail(Error::UnsupportedSysKey)
        };
        let response = Envelope::make(self.strong_ref(), envelope.mid().response_id(), Vec::new(), reply);
        sender.enqueue(response, eu);
        MessageClass::System
      },
      | Payload::Sys(SysMessage::AddSource) => {
        self.register_source(state, eu, envelope);
        MessageClass::System
      },
      | Payload::Sys(SysMessage::DelSource(addr)) => {
        let addr = addr.clone();
        if let Some(released) = state.sources.remove(&addr) {
          self.grant_credit(state, eu, released, None);
        }
        MessageClass::System
      },
      | Payload::Sys(SysMessage::Demand(count)) => {
        let count = *count;
        let Some(sender) = envelope.sender().cloned() else {
          tracing::warn!(actor = self.id(), "dropped ('sys', 'get', n) from anonymous sender");
          return MessageClass::System;
        };
        let Some(entry) = state.generators.get_mut(&sender) else {
          tracing::debug!(actor = self.id(), sink = sender.id(), "dropped ('sys', 'get', n) from unknown sink");
          return MessageClass::System;
        };
        for _ in 0..count {
          if !(entry.run)() {
            break;
          }
        }
        MessageClass::System
      },
      | Payload::Timeout(timeout) => {
        if Self::is_active_timeout(state, timeout.timeout_id) {
          MessageClass::Timeout
        } else {
          MessageClass::ExpiredTimeout
        }
      },
      | Payload::Exit(_) => {
        let Payload::Exit(exit) = envelope.replace_payload(Payload::empty()) else {
          return MessageClass::System;
        };
        self.unlink_from(state, &exit.source);
        if exit.reason == Error::Kill {
          self.quit(state, Error::Kill);
        } else {
          let handler = state.exit_handler.clone();
          let mut ctx = ActorContext::new(self, state, eu);
          (&mut *handler.lock())(&mut ctx, exit);
        }
        MessageClass::System
      },
      | Payload::Down(_) => {
        let Payload::Down(down) = envelope.replace_payload(Payload::empty()) else {
          return MessageClass::System;
        };
        let handler = state.down_handler.clone();
        let mut ctx = ActorContext::new(self, state, eu);
        (&mut *handler.lock())(&mut ctx, down);
        MessageClass::System
      },
      | Payload::Fail(_) => {
        let Payload::Fail(error) = envelope.replace_payload(Payload::empty()) else {
          return MessageClass::System;
        };
        let handler = state.error_handler.clone();
        let mut ctx = ActorContext::new(self, state, eu);
        (&mut *handler.lock())(&mut ctx, error);
        MessageClass::System
      },
      | Payload::SyncTimeout | Payload::User(_) => MessageClass::Ordinary,
    }
  }

  fn register_source(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>, envelope: &Envelope) {
    let Some(sender) = envelope.sender().cloned() else {
      tracing::error!(actor = self.id(), "received ('sys', 'addSource') from anonymous sender");
      return;
    };
    if !envelope.stages().is_empty() {
      tracing::error!(actor = self.id(), "received multi-staged ('sys', 'addSource')");
      return;
    }
    let source_addr = sender.addr();
    if state.sources.contains_key(&source_addr) {
      tracing::error!(actor = self.id(), source = source_addr.id(), "multiple 'addSource' registrations");
      return;
    }
    state.sources.insert(source_addr.clone(), state.open_credit);
    if state.open_credit > 0 {
      self.send_demand(&sender, state.open_credit, eu);
      state.open_credit = 0;
    }
    // have the source's termination hand its credit back to us
    let weak_self = self.addr();
    sender.cell().attach(
      Attachment::Functor(Box::new(move |_, ctx| {
        let Some(me) = weak_self.upgrade() else {
          return;
        };
        me.tell_payload_with_eu(Payload::Sys(SysMessage::DelSource(source_addr)), ctx);
      })),
      eu,
    );
  }

  /// Offers an envelope to the given behavior, honoring the awaited id.
  ///
  /// On a skip the envelope is handed back to the caller for caching.
  pub(crate) fn invoke_message(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    mut envelope: Envelope,
    behavior: Option<Behavior>,
    awaited_id: MessageId,
  ) -> (InvokeOutcome, Option<Envelope>) {
    match self.filter_envelope(state, eu, &mut envelope) {
      | MessageClass::ExpiredTimeout => {
        tracing::debug!(actor = self.id(), "dropped expired timeout message");
        (InvokeOutcome::Dropped, None)
      },
      | MessageClass::System => (InvokeOutcome::Dropped, None),
      | MessageClass::Timeout => {
        if awaited_id.is_valid() {
          tracing::debug!(actor = self.id(), "timeout ignored while awaiting a response");
          return (InvokeOutcome::Dropped, None);
        }
        let Payload::Timeout(timeout) = envelope.payload() else {
          return (InvokeOutcome::Dropped, None);
        };
        self.handle_timeout(state, eu, behavior, timeout.timeout_id);
        (InvokeOutcome::Success, None)
      },
      | MessageClass::Response => self.invoke_response(state, eu, envelope, awaited_id),
      | MessageClass::Ordinary => {
        if awaited_id.is_valid() {
          return (InvokeOutcome::Skipped, Some(envelope));
        }
        self.invoke_ordinary(state, eu, envelope, behavior)
      },
    }
  }

  fn invoke_response(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    envelope: Envelope,
    awaited_id: MessageId,
  ) -> (InvokeOutcome, Option<Envelope>) {
    let mid = envelope.mid();
    if let Some(behavior) = state.multiplexed_responses.get(&mid).cloned() {
      if !awaited_id.is_valid() {
        self.handle_response(state, eu, envelope, &behavior);
        state.multiplexed_responses.remove(&mid);
        return (InvokeOutcome::Success, None);
      }
      return (InvokeOutcome::Skipped, Some(envelope));
    }
    if let Some(behavior) = Self::find_awaited_response(state, mid) {
      if awaited_id.is_valid() && mid == awaited_id {
        self.handle_response(state, eu, envelope, &behavior);
        Self::mark_awaited_arrived(state, mid);
        return (InvokeOutcome::Success, None);
      }
      return (InvokeOutcome::Skipped, Some(envelope));
    }
    tracing::debug!(actor = self.id(), "dropped expired response");
    (InvokeOutcome::Dropped, None)
  }

  fn invoke_ordinary(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    mut envelope: Envelope,
    behavior: Option<Behavior>,
  ) -> (InvokeOutcome, Option<Envelope>) {
    let had_timeout = state.has_timeout;
    if had_timeout {
      state.has_timeout = false;
    }
    let flow_controlled = envelope.mid().is_flow_controlled();
    let flow_source = if flow_controlled { envelope.sender().map(|sender| sender.addr()) } else { None };
    let mut payload = envelope.replace_payload(Payload::empty());
    state.current_element = Some(envelope);
    let mut skipped = false;
    if !flow_controlled {
      let result = self.apply_behavior(state, eu, behavior, &mut payload);
      match result {
        | MatchResult::Skip => skipped = true,
        | MatchResult::NoMatch => {
          if had_timeout {
            state.has_timeout = true;
          }
          let fallback = self.apply_default_handler(state, eu, &mut payload);
          if matches!(fallback, MatchResult::Skip) {
            skipped = true;
          } else {
            self.deliver_match_result(state, eu, fallback);
          }
        },
        | other => self.deliver_match_result(state, eu, other),
      }
    } else {
      match flow_source.filter(|addr| state.sources.contains_key(addr)) {
        | None => {
          tracing::error!(actor = self.id(), "flow-controlled message without a registered source");
        },
        | Some(source) => {
          let result = self.apply_behavior(state, eu, behavior, &mut payload);
          match result {
            | MatchResult::Skip => skipped = true,
            | MatchResult::NoMatch => {
              if had_timeout {
                state.has_timeout = true;
              }
              let fallback = self.apply_default_handler(state, eu, &mut payload);
              if matches!(fallback, MatchResult::Skip) {
                skipped = true;
              } else {
                self.grant_from_match_result(state, eu, fallback, &source);
              }
            },
            | other => self.grant_from_match_result(state, eu, other, &source),
          }
        },
      }
    }
    let envelope = state.current_element.take();
    if skipped {
      if had_timeout {
        state.has_timeout = true;
      }
      if let Some(mut envelope) = envelope {
        envelope.replace_payload(payload);
        return (InvokeOutcome::Skipped, Some(envelope));
      }
    }
    (InvokeOutcome::Success, None)
  }

  fn apply_behavior(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    behavior: Option<Behavior>,
    payload: &mut Payload,
  ) -> MatchResult {
    let Some(behavior) = behavior else {
      return MatchResult::NoMatch;
    };
    let mut ctx = ActorContext::new(self, state, eu);
    behavior.invoke(&mut ctx, payload)
  }

  fn apply_default_handler(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    payload: &mut Payload,
  ) -> MatchResult {
    let handler = state.default_handler.clone();
    let mut ctx = ActorContext::new(self, state, eu);
    let result = (&mut *handler.lock())(&mut ctx, payload);
    result
  }

  /// Interprets a handler return for regular traffic: responses and errors
  /// are delivered through the pending response promise.
  fn deliver_match_result(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>, result: MatchResult) {
    match result {
      | MatchResult::Consumed | MatchResult::NoMatch | MatchResult::Skip => {},
      | MatchResult::Response(message) => {
        let promise = self.make_promise_from_current(state);
        if promise.pending() {
          promise.deliver(message, eu);
        } else {
          tracing::debug!(actor = self.id(), "suppressed response message: no pending request");
        }
      },
      | MatchResult::Fail(error) => {
        let promise = self.make_promise_from_current(state);
        if promise.pending() {
          promise.deliver_error(error, eu);
        }
      },
    }
  }

  /// Interprets a handler return for flow-controlled traffic: an empty
  /// response message grants one credit back to the source.
  fn grant_from_match_result(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    result: MatchResult,
    source: &ActorAddr,
  ) {
    match result {
      | MatchResult::Consumed | MatchResult::NoMatch | MatchResult::Skip => {},
      | MatchResult::Response(message) => {
        if message.is_unit() {
          self.grant_credit(state, eu, 1, Some(source.clone()));
        } else {
          tracing::warn!(actor = self.id(), "flow-controlled message handler returned a message");
        }
      },
      | MatchResult::Fail(_) => {
        tracing::warn!(actor = self.id(), "flow-controlled message handler returned an error");
      },
    }
  }

  /// Runs a response behavior against the delivered payload, escalating
  /// mismatches: error payloads go to the error handler, anything else is
  /// retried as an unexpected-response error before giving up.
  pub(crate) fn handle_response(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    mut envelope: Envelope,
    behavior: &Behavior,
  ) {
    let mut payload = envelope.replace_payload(Payload::empty());
    let previous = state.current_element.replace(envelope);
    if matches!(payload, Payload::SyncTimeout) {
      if behavior.timeout().is_some() {
        let mut ctx = ActorContext::new(self, state, eu);
        behavior.handle_timeout(&mut ctx);
      }
      self.invoke_response_error(state, eu, behavior, Error::RequestTimeout);
    } else {
      let result = {
        let mut ctx = ActorContext::new(self, state, eu);
        behavior.invoke(&mut ctx, &mut payload)
      };
      match result {
        | MatchResult::NoMatch => {
          if let Payload::Fail(error) = payload {
            let handler = state.error_handler.clone();
            let mut ctx = ActorContext::new(self, state, eu);
            (&mut *handler.lock())(&mut ctx, error);
          } else {
            self.invoke_response_error(state, eu, behavior, Error::UnexpectedResponse);
          }
        },
        | other => self.deliver_match_result(state, eu, other),
      }
    }
    state.current_element = previous;
  }

  fn invoke_response_error(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    behavior: &Behavior,
    error: Error,
  ) {
    let mut payload = Payload::Fail(error.clone());
    let result = {
      let mut ctx = ActorContext::new(self, state, eu);
      behavior.invoke(&mut ctx, &mut payload)
    };
    if matches!(result, MatchResult::NoMatch) {
      tracing::warn!(actor = self.id(), "response handler failed to match the delivered error");
      let handler = state.error_handler.clone();
      let mut ctx = ActorContext::new(self, state, eu);
      (&mut *handler.lock())(&mut ctx, error);
    } else {
      self.deliver_match_result(state, eu, result);
    }
  }

  pub(crate) fn make_promise_from_current(&self, state: &mut CellState) -> ResponsePromise {
    let Some(envelope) = state.current_element.as_mut() else {
      return ResponsePromise::invalid();
    };
    if envelope.mid().is_answered() {
      return ResponsePromise::invalid();
    }
    let promise = ResponsePromise::new(self.strong_ref(), envelope);
    envelope.set_mid(envelope.mid().mark_answered());
    promise
  }
}
