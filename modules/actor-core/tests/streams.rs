use core::time::Duration;

use troupe_actor_core_rs::{
  ActorConfig, ActorSystem, ActorSystemConfig, AnyMessage, Behavior, MatchResult, Payload,
};
use troupe_utils_core_rs::{
  concurrent::CountDownLatch,
  sync::{ArcShared, SpinSyncMutex},
};

const ITEMS: u32 = 10;

/// End-to-end credit-based flow control: the producer registers itself as a
/// source at the sink, emits only on `(sys, get, n)` grants, and the sink's
/// empty responses drip credit back one message at a time.
#[test]
fn stream_items_flow_under_credit_control() {
  let system = ActorSystem::new(
    ActorSystemConfig::new()
      .with_open_credit(4)
      .with_low_watermark(1)
      .with_max_credit(4)
      .with_scheduler_threads(2),
  );
  let received = ArcShared::new(SpinSyncMutex::new(Vec::new()));
  let latch = ArcShared::new(CountDownLatch::new(ITEMS as usize));
  let sink = {
    let received = received.clone();
    let latch = latch.clone();
    system.spawn(ActorConfig::from_behavior(move |_| {
      let received = received.clone();
      let latch = latch.clone();
      Behavior::new(move |_, payload| {
        let Some(item) = payload.downcast_user::<u32>() else {
          return MatchResult::NoMatch;
        };
        received.lock().push(*item);
        latch.count_down();
        // an empty response on a flow-controlled message grants one credit
        MatchResult::Response(AnyMessage::unit())
      })
    }))
  };
  let producer = {
    let sink = sink.clone();
    system.spawn(ActorConfig::from_behavior(move |ctx| {
      let mut next = 0_u32;
      let handle = ctx.new_stream(&sink, move || {
        if next == ITEMS {
          return None;
        }
        let item = AnyMessage::new(next);
        next += 1;
        Some(item)
      });
      assert!(handle.is_valid());
      Behavior::new(|_, _| MatchResult::Consumed)
    }))
  };
  assert!(latch.wait_timeout(Duration::from_secs(5)));
  assert_eq!(received.lock().clone(), (0..ITEMS).collect::<Vec<_>>());
  assert!(!producer.is_cleaned_up());
  system.shutdown();
}

#[test]
fn duplicate_streams_for_the_same_sink_are_rejected() {
  let system = ActorSystem::new(ActorSystemConfig::new().with_scheduler_threads(2));
  let sink = system.spawn(ActorConfig::from_behavior(|_| Behavior::new(|_, _| MatchResult::Consumed)));
  let latch = ArcShared::new(CountDownLatch::new(1));
  let handles = ArcShared::new(SpinSyncMutex::new(Vec::new()));
  let _producer = {
    let sink = sink.clone();
    let latch = latch.clone();
    let handles = handles.clone();
    system.spawn(ActorConfig::from_behavior(move |ctx| {
      let first = ctx.new_stream(&sink, || Some(AnyMessage::new(1_u32)));
      let second = ctx.new_stream(&sink, || Some(AnyMessage::new(2_u32)));
      handles.lock().push((first.is_valid(), second.is_valid()));
      latch.count_down();
      Behavior::new(|_, _| MatchResult::Consumed)
    }))
  };
  assert!(latch.wait_timeout(Duration::from_secs(5)));
  assert_eq!(handles.lock().clone(), vec![(true, false)]);
  system.shutdown();
}
