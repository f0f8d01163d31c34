use std::panic::{self, AssertUnwindSafe};

use super::{ActorCell, CellState};
use crate::{
  behavior::Behavior,
  envelope::Envelope,
  error::Error,
  execution_unit::ExecutionUnit,
  invoke_outcome::InvokeOutcome,
  message_id::MessageId,
  resumable::Resumable,
  resume_result::ResumeResult,
};

impl Resumable for ActorCell {
  fn resume(&self, eu: Option<&dyn ExecutionUnit>, max_throughput: usize) -> ResumeResult {
    if self.is_blocking() {
      return ResumeResult::Done;
    }
    let mut state = self.state.lock();
    if state.initialized && (!state.has_behavior() || state.terminated) {
      return ResumeResult::Done;
    }
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch_loop(&mut state, eu, max_throughput)));
    match outcome {
      | Ok(result) => result,
      | Err(payload) => {
        if !state.terminated {
          self.quit(&mut state, Error::UnhandledException);
        }
        let handler = state.exception_handler.clone();
        if let Some(handler) = handler {
          let mapped = (&mut *handler.lock())(payload.as_ref());
          if let Some(reason) = mapped {
            self.quit(&mut state, reason);
          }
        }
        if self.finished(&mut state, eu) {
          ResumeResult::Done
        } else {
          ResumeResult::ResumeLater
        }
      },
    }
  }
}

impl ActorCell {
  fn dispatch_loop(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>, max_throughput: usize) -> ResumeResult {
    if !state.initialized {
      self.initialize(state, eu);
      if self.finished(state, eu) {
        return ResumeResult::Done;
      }
    }
    let mut handled_msgs = 0_usize;
    for _ in 0..max_throughput {
      match self.next_message(state) {
        | Some(envelope) => {
          let (result, outcome) = self.exec_event(state, eu, envelope);
          if result == ResumeResult::Done {
            return ResumeResult::Done;
          }
          if outcome == InvokeOutcome::Success {
            handled_msgs += 1;
          }
        },
        | None => {
          self.rearm_timeout_if_needed(state, eu, handled_msgs);
          if self.mailbox.try_block() {
            return ResumeResult::AwaitingMessage;
          }
        },
      }
    }
    self.rearm_timeout_if_needed(state, eu, handled_msgs);
    if !self.has_next_message(state) && self.mailbox.try_block() {
      return ResumeResult::AwaitingMessage;
    }
    ResumeResult::ResumeLater
  }

  /// Re-arms the top behavior's timeout after a batch in which at least one
  /// message was handled; the previous timeout became stale the moment its
  /// behavior processed something.
  fn rearm_timeout_if_needed(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>, handled_msgs: usize) {
    if handled_msgs == 0 || state.bhvr_stack.is_empty() {
      return;
    }
    let timeout = state.bhvr_stack.back().and_then(Behavior::timeout);
    self.request_timeout(state, eu, timeout);
  }

  pub(crate) fn exec_event(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    envelope: Envelope,
  ) -> (ResumeResult, InvokeOutcome) {
    let (behavior, awaited_id) = Self::current_behavior_and_awaited(state);
    let (outcome, returned) = self.invoke_message(state, eu, envelope, behavior, awaited_id);
    match outcome {
      | InvokeOutcome::Success => {
        state.bhvr_stack.cleanup();
        if self.finished(state, eu) {
          return (ResumeResult::Done, outcome);
        }
        // replay the backlog after every successful delivery; the handler
        // may have changed the behavior to match previously skipped messages
        while self.invoke_from_cache(state, eu) {
          if self.finished(state, eu) {
            return (ResumeResult::Done, outcome);
          }
        }
      },
      | InvokeOutcome::Skipped => {
        if let Some(envelope) = returned {
          self.push_to_cache(state, envelope);
        }
      },
      | InvokeOutcome::Dropped => {
        state.bhvr_stack.cleanup();
        if self.finished(state, eu) {
          return (ResumeResult::Done, outcome);
        }
      },
    }
    (ResumeResult::ResumeLater, outcome)
  }

  pub(crate) fn next_message(&self, state: &mut CellState) -> Option<Envelope> {
    if !self.is_priority_aware() {
      return self.mailbox.try_pop();
    }
    state.cache.refill_first(&self.mailbox);
    state.cache.pop_first_front()
  }

  pub(crate) fn has_next_message(&self, state: &CellState) -> bool {
    if !self.is_priority_aware() {
      return self.mailbox.can_fetch_more();
    }
    !state.cache.first_is_empty() || self.mailbox.can_fetch_more()
  }

  pub(crate) fn push_to_cache(&self, state: &mut CellState, envelope: Envelope) {
    if self.is_priority_aware() {
      state.cache.insert_second_partitioned(envelope);
    } else {
      state.cache.push_second_back(envelope);
    }
  }

  pub(crate) fn invoke_from_cache(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>) -> bool {
    let (behavior, awaited_id) = Self::current_behavior_and_awaited(state);
    let mut index = 0_usize;
    while index < state.cache.second_len() {
      let Some(envelope) = state.cache.second_remove(index) else {
        break;
      };
      let (outcome, returned) = self.invoke_message(state, eu, envelope, behavior.clone(), awaited_id);
      match outcome {
        | InvokeOutcome::Success => return true,
        | InvokeOutcome::Skipped => {
          if let Some(envelope) = returned {
            state.cache.second_insert(index, envelope);
            index += 1;
          }
        },
        | InvokeOutcome::Dropped => {},
      }
    }
    false
  }

  pub(crate) fn current_behavior_and_awaited(state: &CellState) -> (Option<Behavior>, MessageId) {
    if let Some((mid, behavior)) = state.awaited_responses.first() {
      (Some(behavior.clone()), *mid)
    } else {
      (state.bhvr_stack.back().cloned(), MessageId::asynchronous())
    }
  }
}
