use core::any::Any;

use hashbrown::HashMap;
use portable_atomic::{AtomicBool, Ordering};
use troupe_utils_core_rs::sync::{ArcShared, SpinSyncMutex, WeakShared};

use crate::{
  actor_addr::ActorAddr,
  actor_config::{ActFn, ActorConfig, InitFn},
  actor_context::ActorContext,
  actor_ref::ActorRef,
  actor_system::ActorSystem,
  attachment::Attachment,
  behavior::Behavior,
  behavior_stack::BehaviorStack,
  config::ActorSystemConfig,
  down_msg::DownMsg,
  enqueue_outcome::EnqueueOutcome,
  envelope::Envelope,
  error::Error,
  execution_unit::ExecutionUnit,
  exit_msg::ExitMsg,
  group::Group,
  mailbox::Mailbox,
  mailbox_cache::MailboxCache,
  match_result::MatchResult,
  message_id::MessageId,
  payload::Payload,
  private_thread::PrivateThread,
  request_bouncer::RequestBouncer,
  resumable::Resumable,
};

mod credit;
mod dispatch;
mod filter;
mod lifecycle;
mod requests;

#[cfg(test)]
mod tests;

pub(crate) type DefaultHandlerFn = Box<dyn FnMut(&mut ActorContext<'_>, &mut Payload) -> MatchResult + Send>;
pub(crate) type ErrorHandlerFn = Box<dyn FnMut(&mut ActorContext<'_>, Error) + Send>;
pub(crate) type DownHandlerFn = Box<dyn FnMut(&mut ActorContext<'_>, DownMsg) + Send>;
pub(crate) type ExitHandlerFn = Box<dyn FnMut(&mut ActorContext<'_>, ExitMsg) + Send>;
pub(crate) type ExceptionHandlerFn = Box<dyn FnMut(&(dyn Any + Send)) -> Option<Error> + Send>;
pub(crate) type OnExitFn = Box<dyn FnMut(&mut ActorContext<'_>) + Send>;

pub(crate) type HandlerSlot<T> = ArcShared<SpinSyncMutex<T>>;

pub(crate) struct GeneratorEntry {
  pub(crate) run: Box<dyn FnMut() -> bool + Send>,
  pub(crate) _keepalive: ArcShared<ActorCell>,
}

/// Mutable per-actor state.
///
/// Guarded by a single lock on the cell; only the thread holding the mailbox
/// reader role ever takes it for dispatch, so the lock is uncontended in
/// steady state.
pub(crate) struct CellState {
  pub(crate) initialized: bool,
  pub(crate) terminated: bool,
  pub(crate) bhvr_stack: BehaviorStack,
  pub(crate) awaited_responses: Vec<(MessageId, Behavior)>,
  pub(crate) multiplexed_responses: HashMap<MessageId, Behavior>,
  pub(crate) last_request_id: u64,
  pub(crate) timeout_id: u32,
  pub(crate) has_timeout: bool,
  pub(crate) current_element: Option<Envelope>,
  pub(crate) cache: MailboxCache,
  pub(crate) subscriptions: Vec<Group>,
  pub(crate) linked: Vec<ActorAddr>,
  pub(crate) sources: HashMap<ActorAddr, u64>,
  pub(crate) open_credit: u64,
  pub(crate) low_watermark: u64,
  pub(crate) max_credit: u64,
  pub(crate) generators: HashMap<ActorRef, GeneratorEntry>,
  pub(crate) default_handler: HandlerSlot<DefaultHandlerFn>,
  pub(crate) error_handler: HandlerSlot<ErrorHandlerFn>,
  pub(crate) down_handler: HandlerSlot<DownHandlerFn>,
  pub(crate) exit_handler: HandlerSlot<ExitHandlerFn>,
  pub(crate) exception_handler: Option<HandlerSlot<ExceptionHandlerFn>>,
  pub(crate) on_exit: Option<OnExitFn>,
  pub(crate) init: Option<InitFn>,
  pub(crate) act: Option<ActFn>,
}

impl CellState {
  fn new(config: &ActorSystemConfig, init: Option<InitFn>, act: Option<ActFn>) -> Self {
    Self {
      initialized: false,
      terminated: false,
      bhvr_stack: BehaviorStack::new(),
      awaited_responses: Vec::new(),
      multiplexed_responses: HashMap::new(),
      last_request_id: 0,
      timeout_id: 0,
      has_timeout: false,
      current_element: None,
      cache: MailboxCache::default(),
      subscriptions: Vec::new(),
      linked: Vec::new(),
      sources: HashMap::new(),
      open_credit: config.open_credit(),
      low_watermark: config.low_watermark(),
      max_credit: config.max_credit(),
      generators: HashMap::new(),
      default_handler: ArcShared::new(SpinSyncMutex::new(default_unexpected_handler())),
      error_handler: ArcShared::new(SpinSyncMutex::new(default_error_handler())),
      down_handler: ArcShared::new(SpinSyncMutex::new(default_down_handler())),
      exit_handler: ArcShared::new(SpinSyncMutex::new(default_exit_handler())),
      exception_handler: None,
      on_exit: None,
      init,
      act,
    }
  }

  pub(crate) fn has_behavior(&self) -> bool {
    !self.bhvr_stack.is_empty() || !self.awaited_responses.is_empty() || !self.multiplexed_responses.is_empty()
  }

  pub(crate) fn in_flight(&self) -> u64 {
    self.max_credit - self.open_credit
  }
}

fn default_unexpected_handler() -> DefaultHandlerFn {
  Box::new(|ctx, payload| {
    tracing::warn!(actor = ctx.id(), name = %ctx.name(), ?payload, "unexpected message");
    MatchResult::Fail(Error::UnexpectedMessage)
  })
}

fn default_error_handler() -> ErrorHandlerFn {
  Box::new(|ctx, error| ctx.quit(error))
}

fn default_down_handler() -> DownHandlerFn {
  Box::new(|ctx, down| {
    tracing::warn!(actor = ctx.id(), name = %ctx.name(), source = down.source.id(), "unhandled down message");
  })
}

fn default_exit_handler() -> ExitHandlerFn {
  Box::new(|ctx, exit| {
    if !exit.reason.is_normal() {
      ctx.quit(exit.reason);
    }
  })
}

/// Runtime container executing a single actor.
///
/// The cell owns the mailbox and all bookkeeping named by the data model:
/// behavior stack, response tables, timeout ledger, source credit, generator
/// table and lifecycle flags. At most one thread dispatches a cell at any
/// moment; writers interact only with the mailbox and the attachment list.
pub struct ActorCell {
  id: u64,
  name: String,
  system: ActorSystem,
  mailbox: Mailbox,
  detached: bool,
  blocking: bool,
  priority_aware: bool,
  state: SpinSyncMutex<CellState>,
  fail_state: SpinSyncMutex<Error>,
  attachments: SpinSyncMutex<Vec<Attachment>>,
  private_thread: SpinSyncMutex<Option<ArcShared<PrivateThread>>>,
  self_ref: SpinSyncMutex<WeakShared<ActorCell>>,
  cleaned_up: AtomicBool,
  registered: AtomicBool,
}

impl ActorCell {
  pub(crate) fn create(system: &ActorSystem, config: ActorConfig) -> ArcShared<Self> {
    let (init, act, options, name, groups) = config.into_parts();
    let sys_config = system.config().clone();
    let blocking = act.is_some();
    let cell = ArcShared::new(Self {
      id: system.next_actor_id(),
      name: name.unwrap_or_else(|| String::from("actor")),
      system: system.clone(),
      mailbox: Mailbox::new(),
      detached: options.is_detached(),
      blocking,
      priority_aware: options.is_priority_aware(),
      state: SpinSyncMutex::new(CellState::new(&sys_config, init, act)),
      fail_state: SpinSyncMutex::new(Error::Normal),
      attachments: SpinSyncMutex::new(Vec::new()),
      private_thread: SpinSyncMutex::new(None),
      self_ref: SpinSyncMutex::new(WeakShared::new()),
      cleaned_up: AtomicBool::new(false),
      registered: AtomicBool::new(false),
    });
    *cell.self_ref.lock() = cell.downgrade();
    for group in groups {
      if group.subscribe(&cell) {
        cell.state.lock().subscriptions.push(group);
      }
    }
    cell
  }

  /// Returns the actor id.
  #[must_use]
  pub fn id(&self) -> u64 {
    self.id
  }

  /// Returns the actor's name.
  #[must_use]
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Returns the hosting system.
  #[must_use]
  pub fn system(&self) -> &ActorSystem {
    &self.system
  }

  /// Returns the weak address of this actor.
  #[must_use]
  pub fn addr(&self) -> ActorAddr {
    ActorAddr::new(self.id, self.self_ref.lock().clone())
  }

  /// Returns `true` once cleanup has run.
  #[must_use]
  pub fn is_cleaned_up(&self) -> bool {
    self.cleaned_up.load(Ordering::Acquire)
  }

  /// Returns the current fail state.
  #[must_use]
  pub fn fail_state(&self) -> Error {
    self.fail_state.lock().clone()
  }

  pub(crate) fn mailbox(&self) -> &Mailbox {
    &self.mailbox
  }

  pub(crate) const fn is_detached(&self) -> bool {
    self.detached
  }

  pub(crate) const fn is_blocking(&self) -> bool {
    self.blocking
  }

  pub(crate) const fn is_priority_aware(&self) -> bool {
    self.priority_aware
  }

  pub(crate) fn strong_ref(&self) -> Option<ActorRef> {
    self.self_ref.lock().upgrade().map(ActorRef::from_cell)
  }

  pub(crate) fn launch(self_arc: &ArcShared<Self>, eu: Option<&dyn ExecutionUnit>, lazy: bool, hide: bool) {
    if !hide {
      self_arc.registered.store(true, Ordering::Release);
      self_arc.system.register(self_arc);
    }
    if self_arc.detached {
      if self_arc.blocking {
        let cell = self_arc.clone();
        std::thread::spawn(move || cell.run_blocking());
        return;
      }
      let thread = PrivateThread::new(self_arc.system.clone());
      *self_arc.private_thread.lock() = Some(thread.clone());
      PrivateThread::start(&thread, self_arc.clone());
      return;
    }
    // lazily initialized actors stay off the scheduler until the first
    // enqueue flips the mailbox back to runnable
    if lazy && self_arc.mailbox.try_block() {
      return;
    }
    let job = self_arc.clone().into_dyn(|cell| cell as &dyn Resumable);
    match eu {
      | Some(eu) => eu.exec_later(job),
      | None => self_arc.system.scheduler().exec_later(job),
    }
  }

  pub(crate) fn enqueue(self_arc: &ArcShared<Self>, envelope: Envelope, eu: Option<&dyn ExecutionUnit>) {
    match self_arc.mailbox.enqueue(envelope) {
      | EnqueueOutcome::Success => {},
      | EnqueueOutcome::UnblockedReader => {
        if self_arc.detached {
          let thread = self_arc.private_thread.lock().clone();
          if let Some(thread) = thread {
            thread.resume(self_arc.clone());
          }
        } else {
          let job = self_arc.clone().into_dyn(|cell| cell as &dyn Resumable);
          match eu {
            | Some(eu) => eu.exec_later(job),
            | None => self_arc.system.scheduler().exec_later(job),
          }
        }
      },
      | EnqueueOutcome::QueueClosed(envelope) => {
        if envelope.mid().is_request() {
          let reason = self_arc.fail_state.lock().clone();
          RequestBouncer::new(reason).bounce(envelope, eu);
        }
      },
    }
  }

  pub(crate) fn attach(&self, attachment: Attachment, eu: Option<&dyn ExecutionUnit>) {
    {
      let mut attachments = self.attachments.lock();
      if !self.is_cleaned_up() {
        attachments.push(attachment);
        return;
      }
    }
    let reason = self.fail_state.lock().clone();
    self.fire_attachment(attachment, &reason, eu);
  }

  pub(crate) fn detach_monitor(&self, observer: &ActorAddr) {
    self.attachments.lock().retain(|attachment| !attachment.matches_monitor(observer));
  }

  pub(crate) fn detach_link(&self, peer: &ActorAddr) {
    self.attachments.lock().retain(|attachment| !attachment.matches_link(peer));
  }

  fn fire_attachment(&self, attachment: Attachment, reason: &Error, eu: Option<&dyn ExecutionUnit>) {
    match attachment {
      | Attachment::Monitor(observer) => {
        if let Some(target) = observer.upgrade() {
          let down = DownMsg { source: self.addr(), reason: reason.clone() };
          target.enqueue(Envelope::make(None, MessageId::asynchronous(), Vec::new(), Payload::Down(down)), eu);
        }
      },
      | Attachment::Link(peer) => {
        if let Some(target) = peer.upgrade() {
          let exit = ExitMsg { source: self.addr(), reason: reason.clone() };
          target.enqueue(Envelope::make(None, MessageId::asynchronous(), Vec::new(), Payload::Exit(exit)), eu);
        }
      },
      | Attachment::Functor(callback) => callback(reason, eu),
    }
  }

  fn fire_attachments(&self, reason: &Error, eu: Option<&dyn ExecutionUnit>) {
    let attachments = core::mem::take(&mut *self.attachments.lock());
    for attachment in attachments {
      self.fire_attachment(attachment, reason, eu);
    }
  }
}

impl Drop for ActorCell {
  fn drop(&mut self) {
    if !self.is_cleaned_up() {
      let mut state = self.state.lock();
      self.run_on_exit(&mut state, None);
      self.cleanup(&mut state, None, Error::Unreachable);
    }
    let thread = self.private_thread.lock().take();
    if let Some(thread) = thread {
      thread.notify_self_destroyed();
    }
  }
}

impl core::fmt::Debug for ActorCell {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ActorCell")
      .field("id", &self.id)
      .field("name", &self.name)
      .field("detached", &self.detached)
      .field("blocking", &self.blocking)
      .finish()
  }
}
