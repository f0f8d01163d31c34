use core::time::Duration;
use std::sync::{Condvar, Mutex};

#[cfg(test)]
mod tests;

/// One-shot barrier that opens once its counter reaches zero.
///
/// Used by tests and shutdown paths to rendezvous with work running on
/// scheduler or private threads.
pub struct CountDownLatch {
  count: Mutex<usize>,
  opened: Condvar,
}

impl CountDownLatch {
  /// Creates a latch that opens after `count` calls to [`CountDownLatch::count_down`].
  #[must_use]
  pub const fn new(count: usize) -> Self {
    Self { count: Mutex::new(count), opened: Condvar::new() }
  }

  /// Decrements the counter, waking all waiters when it reaches zero.
  pub fn count_down(&self) {
    let Ok(mut guard) = self.count.lock() else { return };
    if *guard > 0 {
      *guard -= 1;
    }
    if *guard == 0 {
      self.opened.notify_all();
    }
  }

  /// Returns the current counter value.
  #[must_use]
  pub fn count(&self) -> usize {
    self.count.lock().map(|guard| *guard).unwrap_or(0)
  }

  /// Blocks until the counter reaches zero.
  pub fn wait(&self) {
    let Ok(mut guard) = self.count.lock() else { return };
    while *guard > 0 {
      let Ok(next) = self.opened.wait(guard) else { return };
      guard = next;
    }
  }

  /// Blocks until the counter reaches zero or the timeout elapses.
  ///
  /// Returns `true` when the latch opened within the timeout.
  pub fn wait_timeout(&self, timeout: Duration) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    let Ok(mut guard) = self.count.lock() else { return false };
    while *guard > 0 {
      let now = std::time::Instant::now();
      if now >= deadline {
        return false;
      }
      let Ok((next, _)) = self.opened.wait_timeout(guard, deadline - now) else { return false };
      guard = next;
    }
    true
  }
}

impl core::fmt::Debug for CountDownLatch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("CountDownLatch").field("count", &self.count()).finish()
  }
}
