use core::time::Duration;
use std::thread;

use super::CountDownLatch;
use crate::sync::ArcShared;

#[test]
fn opens_when_counter_reaches_zero() {
  let latch = CountDownLatch::new(2);
  latch.count_down();
  assert_eq!(latch.count(), 1);
  latch.count_down();
  assert_eq!(latch.count(), 0);
  latch.wait();
}

#[test]
fn extra_count_down_calls_are_ignored() {
  let latch = CountDownLatch::new(1);
  latch.count_down();
  latch.count_down();
  assert_eq!(latch.count(), 0);
}

#[test]
fn wait_timeout_reports_expiry() {
  let latch = CountDownLatch::new(1);
  assert!(!latch.wait_timeout(Duration::from_millis(10)));
}

#[test]
fn wakes_a_blocked_waiter() {
  let latch = ArcShared::new(CountDownLatch::new(1));
  let handle = {
    let latch = latch.clone();
    thread::spawn(move || latch.wait_timeout(Duration::from_secs(5)))
  };
  thread::sleep(Duration::from_millis(5));
  latch.count_down();
  assert!(handle.join().unwrap());
}
