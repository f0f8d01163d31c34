use std::panic::{self, AssertUnwindSafe};

use super::{ActorCell, CellState};
use crate::{
  actor_addr::ActorAddr, actor_context::ActorContext, behavior::Behavior, error::Error,
  execution_unit::ExecutionUnit, request_bouncer::RequestBouncer,
};

impl ActorCell {
  /// Runs the initial-behavior factory and installs its result.
  pub(crate) fn initialize(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>) {
    state.initialized = true;
    let Some(init) = state.init.take() else {
      return;
    };
    let behavior = {
      let mut ctx = ActorContext::new(self, state, eu);
      init(&mut ctx)
    };
    self.do_become(state, eu, behavior, false);
  }

  /// Installs a behavior, optionally replacing the current top of the stack.
  pub(crate) fn do_become(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    behavior: Behavior,
    discard_old: bool,
  ) {
    if discard_old {
      state.bhvr_stack.pop_back();
    }
    // request_timeout clears the armed timeout when the behavior has none
    let timeout = behavior.timeout();
    self.request_timeout(state, eu, timeout);
    state.bhvr_stack.push_back(behavior);
  }

  /// Marks the actor terminated with the given reason.
  pub(crate) fn quit(&self, state: &mut CellState, reason: Error) {
    *self.fail_state.lock() = reason;
    state.terminated = true;
  }

  /// Checks for the end of the actor's lifetime, tearing it down when no
  /// behavior remains or a fail state was set.
  pub(crate) fn finished(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>) -> bool {
    if state.has_behavior() && !state.terminated {
      return false;
    }
    self.run_on_exit(state, eu);
    state.bhvr_stack.clear();
    state.bhvr_stack.cleanup();
    let reason = self.fail_state.lock().clone();
    self.cleanup(state, eu, reason);
    true
  }

  pub(crate) fn run_on_exit(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>) {
    let Some(mut on_exit) = state.on_exit.take() else {
      return;
    };
    let mut ctx = ActorContext::new(self, state, eu);
    on_exit(&mut ctx);
  }

  /// Tears the actor down exactly once.
  ///
  /// Closes the mailbox behind a request bouncer, drains the owned cache
  /// through the same bouncer, breaks the generator self-reference cycle,
  /// clears both response tables, leaves every group, deregisters and fires
  /// the attached monitors, links and functors.
  pub(crate) fn cleanup(&self, state: &mut CellState, eu: Option<&dyn ExecutionUnit>, reason: Error) {
    if self.cleaned_up.swap(true, portable_atomic::Ordering::AcqRel) {
      return;
    }
    *self.fail_state.lock() = reason.clone();
    if self.is_detached() && !self.is_blocking() {
      let thread = self.private_thread.lock().clone();
      if let Some(thread) = thread {
        thread.shutdown();
      }
    }
    state.generators.clear();
    state.current_element = None;
    let bouncer = RequestBouncer::new(reason.clone());
    if !self.mailbox.is_closed() {
      self.mailbox.close(|envelope| bouncer.bounce(envelope, eu));
    }
    for envelope in state.cache.drain_all() {
      bouncer.bounce(envelope, eu);
    }
    state.awaited_responses.clear();
    state.multiplexed_responses.clear();
    for group in state.subscriptions.drain(..) {
      group.unsubscribe(self.id());
    }
    if self.registered.swap(false, portable_atomic::Ordering::AcqRel) {
      self.system().deregister(self.id());
    }
    self.fire_attachments(&reason, eu);
  }

  pub(crate) fn unlink_from(&self, state: &mut CellState, peer: &ActorAddr) {
    state.linked.retain(|addr| addr != peer);
    if let Some(target) = peer.upgrade() {
      target.cell().detach_link(&self.addr());
    }
  }

  /// Thread body of a blocking actor.
  ///
  /// The step function's `Err` return is the unwinding `quit`; panics are
  /// mapped through the exception handler. `on_exit` and `cleanup` always
  /// run.
  pub(crate) fn run_blocking(&self) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
      let mut state = self.state.lock();
      state.initialized = true;
      let Some(act) = state.act.take() else {
        return Ok(());
      };
      let mut ctx = ActorContext::new(self, &mut state, None);
      act(&mut ctx)
    }));
    let reason = match outcome {
      | Ok(Ok(())) => self.fail_state.lock().clone(),
      | Ok(Err(reason)) => reason,
      | Err(payload) => {
        let handler = self.state.lock().exception_handler.clone();
        let mapped = handler.and_then(|handler| (&mut *handler.lock())(payload.as_ref()));
        mapped.unwrap_or(Error::UnhandledException)
      },
    };
    let mut state = self.state.lock();
    self.quit(&mut state, reason.clone());
    self.run_on_exit(&mut state, None);
    self.cleanup(&mut state, None, reason);
  }
}
