use core::time::Duration;
use std::time::Instant;

use troupe_actor_core_rs::{
  ActorConfig, ActorSystem, ActorSystemConfig, Behavior, Error, MatchResult, Payload,
};
use troupe_utils_core_rs::{
  concurrent::CountDownLatch,
  sync::{ArcShared, SpinSyncMutex},
};

fn test_system() -> ActorSystem {
  ActorSystem::new(ActorSystemConfig::new().with_scheduler_threads(2))
}

#[test]
fn superseded_timeouts_expire_without_side_effects() {
  let system = test_system();
  let fired = ArcShared::new(SpinSyncMutex::new(Vec::new()));
  let latch = ArcShared::new(CountDownLatch::new(1));
  let started = Instant::now();
  let _actor = {
    let fired = fired.clone();
    let latch = latch.clone();
    system.spawn(ActorConfig::from_behavior(move |ctx| {
      // the first behavior's short timeout is superseded immediately by the
      // one armed for the behavior pushed on top of it
      let first = {
        let fired = fired.clone();
        Behavior::new(|_, _| MatchResult::Consumed).with_timeout(Duration::from_millis(50), move |_| {
          fired.lock().push("first");
        })
      };
      ctx.do_become(first, false);
      let fired = fired.clone();
      let latch = latch.clone();
      Behavior::new(|_, _| MatchResult::Consumed).with_timeout(Duration::from_millis(300), move |_| {
        fired.lock().push("second");
        latch.count_down();
      })
    }))
  };
  assert!(latch.wait_timeout(Duration::from_secs(5)));
  assert!(started.elapsed() >= Duration::from_millis(250));
  assert_eq!(fired.lock().clone(), vec!["second"]);
  system.shutdown();
}

#[test]
fn awaited_requests_time_out_with_a_fabricated_error() {
  let system = test_system();
  // consumes requests without ever answering them
  let black_hole = system.spawn(ActorConfig::from_behavior(|_| Behavior::new(|_, _| MatchResult::Consumed)));
  let observed = ArcShared::new(SpinSyncMutex::new(None));
  let latch = ArcShared::new(CountDownLatch::new(1));
  let _requester = {
    let observed = observed.clone();
    let latch = latch.clone();
    let black_hole = black_hole.clone();
    system.spawn(ActorConfig::from_behavior(move |ctx| {
      let handler = {
        let observed = observed.clone();
        let latch = latch.clone();
        Behavior::new(move |_, payload| {
          let Payload::Fail(error) = payload else {
            return MatchResult::NoMatch;
          };
          observed.lock().replace(error.clone());
          latch.count_down();
          MatchResult::Consumed
        })
        .with_timeout(Duration::from_millis(50), |_| {})
      };
      ctx.request_await(&black_hole, Payload::user(1_i32), handler);
      Behavior::new(|_, _| MatchResult::Consumed)
    }))
  };
  assert!(latch.wait_timeout(Duration::from_secs(5)));
  assert_eq!(observed.lock().clone(), Some(Error::RequestTimeout));
  system.shutdown();
}

#[test]
fn multiplexed_requests_time_out_independently() {
  let system = test_system();
  let black_hole = system.spawn(ActorConfig::from_behavior(|_| Behavior::new(|_, _| MatchResult::Consumed)));
  let observed = ArcShared::new(SpinSyncMutex::new(Vec::new()));
  let latch = ArcShared::new(CountDownLatch::new(2));
  let _requester = {
    let observed = observed.clone();
    let latch = latch.clone();
    let black_hole = black_hole.clone();
    system.spawn(ActorConfig::from_behavior(move |ctx| {
      for tag in ["left", "right"] {
        let handler = {
          let observed = observed.clone();
          let latch = latch.clone();
          Behavior::new(move |_, payload| {
            let Payload::Fail(error) = payload else {
              return MatchResult::NoMatch;
            };
            observed.lock().push((tag, error.clone()));
            latch.count_down();
            MatchResult::Consumed
          })
          .with_timeout(Duration::from_millis(50), |_| {})
        };
        ctx.request_then(&black_hole, Payload::user(2_i32), handler);
      }
      Behavior::new(|_, _| MatchResult::Consumed)
    }))
  };
  assert!(latch.wait_timeout(Duration::from_secs(5)));
  let outcomes = observed.lock().clone();
  assert_eq!(outcomes.len(), 2);
  assert!(outcomes.iter().all(|(_, error)| *error == Error::RequestTimeout));
  system.shutdown();
}
