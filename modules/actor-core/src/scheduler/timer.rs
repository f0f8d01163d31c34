use core::cmp::Ordering as CmpOrdering;
use core::time::Duration;
use std::collections::BinaryHeap;
use std::sync::{Condvar, Mutex};
use std::time::Instant;

use troupe_utils_core_rs::sync::ArcShared;

use crate::{actor_ref::ActorRef, envelope::Envelope};

struct TimerEntry {
  due: Instant,
  sequence: u64,
  target: ActorRef,
  envelope: Envelope,
}

impl PartialEq for TimerEntry {
  fn eq(&self, other: &Self) -> bool {
    self.due == other.due && self.sequence == other.sequence
  }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
  fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
    Some(self.cmp(other))
  }
}

impl Ord for TimerEntry {
  // earliest deadline first; BinaryHeap is a max-heap
  fn cmp(&self, other: &Self) -> CmpOrdering {
    other.due.cmp(&self.due).then_with(|| other.sequence.cmp(&self.sequence))
  }
}

struct TimerState {
  heap: BinaryHeap<TimerEntry>,
  next_sequence: u64,
  stopping: bool,
}

pub(super) struct TimerCore {
  state: Mutex<TimerState>,
  changed: Condvar,
}

impl TimerCore {
  pub(super) fn new() -> ArcShared<Self> {
    ArcShared::new(Self {
      state: Mutex::new(TimerState { heap: BinaryHeap::new(), next_sequence: 0, stopping: false }),
      changed: Condvar::new(),
    })
  }

  pub(super) fn schedule(&self, delay: Duration, target: ActorRef, envelope: Envelope) {
    let Ok(mut state) = self.state.lock() else {
      return;
    };
    if state.stopping {
      return;
    }
    let sequence = state.next_sequence;
    state.next_sequence += 1;
    state.heap.push(TimerEntry { due: Instant::now() + delay, sequence, target, envelope });
    self.changed.notify_one();
  }

  pub(super) fn stop(&self) {
    if let Ok(mut state) = self.state.lock() {
      state.stopping = true;
      state.heap.clear();
      self.changed.notify_all();
    }
  }
}

pub(super) fn timer_loop(core: &ArcShared<TimerCore>) {
  let Ok(mut state) = core.state.lock() else {
    return;
  };
  loop {
    if state.stopping {
      return;
    }
    let now = Instant::now();
    match state.heap.peek().map(|entry| entry.due) {
      | Some(due) if due <= now => {
        let Some(entry) = state.heap.pop() else {
          continue;
        };
        drop(state);
        entry.target.enqueue(entry.envelope, None);
        let Ok(reacquired) = core.state.lock() else {
          return;
        };
        state = reacquired;
      },
      | Some(due) => {
        let Ok((next, _)) = core.changed.wait_timeout(state, due - now) else {
          return;
        };
        state = next;
      },
      | None => {
        let Ok(next) = core.changed.wait(state) else {
          return;
        };
        state = next;
      },
    }
  }
}
