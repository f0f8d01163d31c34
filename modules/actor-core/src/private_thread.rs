use std::sync::{Condvar, Mutex};

use troupe_utils_core_rs::sync::{ArcShared, SpinSyncMutex};

use crate::{actor_cell::ActorCell, actor_system::ActorSystem, resumable::Resumable, resume_result::ResumeResult};

#[derive(Clone, Copy, PartialEq, Eq)]
enum WorkerState {
  Active,
  ShutdownRequested,
  AwaitResumeOrShutdown,
}

struct SignalState {
  state: WorkerState,
  self_destroyed: bool,
}

/// Dedicated worker thread of a detached actor.
///
/// Drives the same dispatch engine as the scheduler, with unbounded
/// throughput. The strong job reference is released whenever the actor
/// blocks or finishes; `resume` hands it back together with the wakeup. After
/// the run loop exits, the thread waits for the actor object's destruction
/// before decrementing the system's detached-thread counter, so the worker
/// never outlives state it might still be signalled through.
pub(crate) struct PrivateThread {
  signal: Mutex<SignalState>,
  cv: Condvar,
  job: SpinSyncMutex<Option<ArcShared<ActorCell>>>,
  system: ActorSystem,
}

impl PrivateThread {
  pub(crate) fn new(system: ActorSystem) -> ArcShared<Self> {
    system.inc_detached_threads();
    ArcShared::new(Self {
      signal: Mutex::new(SignalState { state: WorkerState::Active, self_destroyed: false }),
      cv: Condvar::new(),
      job: SpinSyncMutex::new(None),
      system,
    })
  }

  pub(crate) fn start(this: &ArcShared<Self>, job: ArcShared<ActorCell>) {
    *this.job.lock() = Some(job);
    let thread = this.clone();
    std::thread::spawn(move || {
      thread.run();
      thread.await_self_destroyed();
      thread.system.dec_detached_threads();
    });
  }

  fn run(&self) {
    loop {
      self.set_state(WorkerState::AwaitResumeOrShutdown);
      loop {
        let job = self.job.lock().clone();
        let Some(job) = job else {
          break;
        };
        match job.resume(None, usize::MAX) {
          | ResumeResult::ResumeLater => {},
          | ResumeResult::Done | ResumeResult::Shutdown => {
            self.job.lock().take();
            return;
          },
          | ResumeResult::AwaitingMessage => {
            self.job.lock().take();
            break;
          },
        }
      }
      if !self.await_resume() {
        return;
      }
    }
  }

  fn set_state(&self, state: WorkerState) {
    let Ok(mut signal) = self.signal.lock() else {
      return;
    };
    signal.state = state;
  }

  /// Waits until the actor becomes ready again or shutdown was requested.
  fn await_resume(&self) -> bool {
    let Ok(mut signal) = self.signal.lock() else {
      return false;
    };
    while signal.state == WorkerState::AwaitResumeOrShutdown {
      let Ok(next) = self.cv.wait(signal) else {
        return false;
      };
      signal = next;
    }
    signal.state == WorkerState::Active
  }

  /// Hands the job back to the worker and wakes it.
  pub(crate) fn resume(&self, job: ArcShared<ActorCell>) {
    *self.job.lock() = Some(job);
    if let Ok(mut signal) = self.signal.lock() {
      signal.state = WorkerState::Active;
      self.cv.notify_one();
    }
  }

  /// Requests the worker to exit once the actor is done.
  pub(crate) fn shutdown(&self) {
    if let Ok(mut signal) = self.signal.lock() {
      signal.state = WorkerState::ShutdownRequested;
      self.cv.notify_one();
    }
  }

  /// Signals that the actor object has been destroyed.
  pub(crate) fn notify_self_destroyed(&self) {
    if let Ok(mut signal) = self.signal.lock() {
      signal.self_destroyed = true;
      self.cv.notify_one();
    }
  }

  fn await_self_destroyed(&self) {
    let Ok(mut signal) = self.signal.lock() else {
      return;
    };
    while !signal.self_destroyed {
      let Ok(next) = self.cv.wait(signal) else {
        return;
      };
      signal = next;
    }
  }
}
