use std::sync::{Condvar, Mutex};

use hashbrown::HashMap;
use portable_atomic::{AtomicU64, Ordering};
use troupe_utils_core_rs::sync::{ArcShared, SpinSyncMutex, WeakShared};

use crate::{
  actor_cell::ActorCell, actor_config::ActorConfig, actor_ref::ActorRef, config::ActorSystemConfig,
  scheduler::Scheduler,
};

struct SystemState {
  config: ActorSystemConfig,
  scheduler: Scheduler,
  registry: SpinSyncMutex<HashMap<u64, WeakShared<ActorCell>>>,
  next_actor_id: AtomicU64,
  detached_threads: Mutex<usize>,
  detached_drained: Condvar,
}

/// Handle to the runtime hosting a set of actors.
///
/// Owns the registry, the default scheduler and the detached-thread
/// accounting. Every actor receives a clone of this handle at construction;
/// nothing in the runtime relies on process globals.
pub struct ActorSystem {
  state: ArcShared<SystemState>,
}

impl ActorSystem {
  /// Creates a system with the given configuration and starts its scheduler.
  #[must_use]
  pub fn new(config: ActorSystemConfig) -> Self {
    let scheduler = Scheduler::start(config.scheduler_threads(), config.scheduler_max_throughput());
    Self {
      state: ArcShared::new(SystemState {
        config,
        scheduler,
        registry: SpinSyncMutex::new(HashMap::new()),
        next_actor_id: AtomicU64::new(1),
        detached_threads: Mutex::new(0),
        detached_drained: Condvar::new(),
      }),
    }
  }

  /// Returns the system configuration.
  #[must_use]
  pub fn config(&self) -> &ActorSystemConfig {
    &self.state.config
  }

  /// Returns the default scheduler.
  #[must_use]
  pub fn scheduler(&self) -> &Scheduler {
    &self.state.scheduler
  }

  /// Creates and launches an actor.
  pub fn spawn(&self, config: ActorConfig) -> ActorRef {
    let options = config.options();
    let cell = ActorCell::create(self, config);
    ActorCell::launch(&cell, None, options.is_lazy(), options.is_hidden());
    ActorRef::from_cell(cell)
  }

  /// Looks up a registered actor by id.
  #[must_use]
  pub fn registered_actor(&self, id: u64) -> Option<ActorRef> {
    self.state.registry.lock().get(&id).and_then(WeakShared::upgrade).map(ActorRef::from_cell)
  }

  /// Returns the number of registered actors still alive.
  #[must_use]
  pub fn registered_count(&self) -> usize {
    self.state.registry.lock().values().filter(|cell| cell.upgrade().is_some()).count()
  }

  /// Blocks until every detached actor's worker thread has exited.
  pub fn await_detached_threads(&self) {
    let Ok(mut count) = self.state.detached_threads.lock() else {
      return;
    };
    while *count > 0 {
      let Ok(next) = self.state.detached_drained.wait(count) else {
        return;
      };
      count = next;
    }
  }

  /// Stops the scheduler, dropping queued jobs and pending delayed sends.
  pub fn shutdown(&self) {
    self.state.scheduler.shutdown();
  }

  pub(crate) fn next_actor_id(&self) -> u64 {
    self.state.next_actor_id.fetch_add(1, Ordering::AcqRel)
  }

  pub(crate) fn register(&self, cell: &ArcShared<ActorCell>) {
    self.state.registry.lock().insert(cell.id(), cell.downgrade());
  }

  pub(crate) fn deregister(&self, id: u64) {
    self.state.registry.lock().remove(&id);
  }

  pub(crate) fn inc_detached_threads(&self) {
    if let Ok(mut count) = self.state.detached_threads.lock() {
      *count += 1;
    }
  }

  pub(crate) fn dec_detached_threads(&self) {
    if let Ok(mut count) = self.state.detached_threads.lock() {
      *count = count.saturating_sub(1);
      if *count == 0 {
        self.state.detached_drained.notify_all();
      }
    }
  }
}

impl Clone for ActorSystem {
  fn clone(&self) -> Self {
    Self { state: self.state.clone() }
  }
}

impl Default for ActorSystem {
  fn default() -> Self {
    Self::new(ActorSystemConfig::new())
  }
}

impl core::fmt::Debug for ActorSystem {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ActorSystem").field("config", &self.state.config).finish()
  }
}
