use core::time::Duration;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::thread::JoinHandle;

use portable_atomic::{AtomicBool, Ordering};
use troupe_utils_core_rs::sync::{ArcShared, SpinSyncMutex};

use crate::{actor_ref::ActorRef, envelope::Envelope, resumable::Resumable};

mod timer;
mod worker;

use timer::TimerCore;

pub(crate) struct SchedulerCore {
  queue: Mutex<VecDeque<ArcShared<dyn Resumable>>>,
  available: Condvar,
  stopping: AtomicBool,
  max_throughput: usize,
}

impl SchedulerCore {
  pub(crate) fn push(&self, job: ArcShared<dyn Resumable>) {
    let Ok(mut queue) = self.queue.lock() else {
      return;
    };
    queue.push_back(job);
    self.available.notify_one();
  }

  fn pop(&self) -> Option<ArcShared<dyn Resumable>> {
    let Ok(mut queue) = self.queue.lock() else {
      return None;
    };
    loop {
      if self.stopping.load(Ordering::Acquire) {
        return None;
      }
      if let Some(job) = queue.pop_front() {
        return Some(job);
      }
      let Ok(next) = self.available.wait(queue) else {
        return None;
      };
      queue = next;
    }
  }

  pub(crate) const fn max_throughput(&self) -> usize {
    self.max_throughput
  }
}

/// Default coordinator driving scheduled actors.
///
/// A fixed pool of workers drains a shared injector queue; each worker doubles
/// as the execution unit of the jobs it runs. A separate timer thread owns
/// the deadline heap behind `delayed_send`.
pub struct Scheduler {
  core: ArcShared<SchedulerCore>,
  timer: ArcShared<TimerCore>,
  threads: SpinSyncMutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
  pub(crate) fn start(threads: usize, max_throughput: usize) -> Self {
    let core = ArcShared::new(SchedulerCore {
      queue: Mutex::new(VecDeque::new()),
      available: Condvar::new(),
      stopping: AtomicBool::new(false),
      max_throughput,
    });
    let timer = TimerCore::new();
    let mut handles = Vec::with_capacity(threads + 1);
    for _ in 0..threads.max(1) {
      let core = core.clone();
      handles.push(std::thread::spawn(move || worker::worker_loop(&core)));
    }
    {
      let timer = timer.clone();
      handles.push(std::thread::spawn(move || timer::timer_loop(&timer)));
    }
    Self { core, timer, threads: SpinSyncMutex::new(handles) }
  }

  /// Submits a job to the worker pool.
  pub fn exec_later(&self, job: ArcShared<dyn Resumable>) {
    self.core.push(job);
  }

  /// Delivers an envelope to `target` after `delay` elapsed.
  pub fn delayed_send(&self, delay: Duration, target: ActorRef, envelope: Envelope) {
    self.timer.schedule(delay, target, envelope);
  }

  /// Stops the workers and the timer, joining every thread.
  ///
  /// Queued jobs and pending delayed sends are dropped.
  pub fn shutdown(&self) {
    self.core.stopping.store(true, Ordering::Release);
    if let Ok(mut queue) = self.core.queue.lock() {
      queue.clear();
      self.core.available.notify_all();
    }
    self.timer.stop();
    let handles = core::mem::take(&mut *self.threads.lock());
    for handle in handles {
      if std::thread::current().id() != handle.thread().id() {
        let _ = handle.join();
      }
    }
  }
}

impl Drop for Scheduler {
  fn drop(&mut self) {
    self.shutdown();
  }
}

impl core::fmt::Debug for Scheduler {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Scheduler").field("max_throughput", &self.core.max_throughput).finish()
  }
}
