use core::time::Duration;

use troupe_actor_core_rs::{
  ActorConfig, ActorSystem, ActorSystemConfig, AnyMessage, Behavior, Envelope, MatchResult, MessageId, Payload,
  SpawnOptions,
};
use troupe_utils_core_rs::{
  concurrent::CountDownLatch,
  sync::{ArcShared, SpinSyncMutex},
};

struct Gate;

#[derive(Clone, Copy)]
struct Item {
  tag: u32,
}

fn high_priority_item(tag: u32) -> Envelope {
  Envelope::make(
    None,
    MessageId::asynchronous().with_high_priority(),
    Vec::new(),
    Payload::user(Item { tag }),
  )
}

fn normal_item(tag: u32) -> Envelope {
  Envelope::make(None, MessageId::asynchronous(), Vec::new(), Payload::user(Item { tag }))
}

/// While the actor is busy inside a handler, a burst of mixed-priority
/// envelopes lands in the mailbox. The next pull cycle must deliver every
/// high-priority envelope first, FIFO within each priority class.
#[test]
fn priority_aware_actors_reorder_each_pull_cycle() {
  let system = ActorSystem::new(ActorSystemConfig::new().with_scheduler_threads(2));
  let entered = ArcShared::new(CountDownLatch::new(1));
  let release = ArcShared::new(CountDownLatch::new(1));
  let done = ArcShared::new(CountDownLatch::new(4));
  let order = ArcShared::new(SpinSyncMutex::new(Vec::new()));
  let actor = {
    let entered = entered.clone();
    let release = release.clone();
    let done = done.clone();
    let order = order.clone();
    system.spawn(
      ActorConfig::from_behavior(move |_| {
        let entered = entered.clone();
        let release = release.clone();
        let done = done.clone();
        let order = order.clone();
        Behavior::new(move |_, payload| {
          if payload.downcast_user::<Gate>().is_some() {
            entered.count_down();
            release.wait();
            return MatchResult::Consumed;
          }
          if let Some(item) = payload.downcast_user::<Item>() {
            order.lock().push(item.tag);
            done.count_down();
            return MatchResult::Consumed;
          }
          MatchResult::NoMatch
        })
      })
      .with_options(SpawnOptions::new().priority_aware()),
    )
  };
  actor.tell(AnyMessage::new(Gate));
  assert!(entered.wait_timeout(Duration::from_secs(5)));
  // the actor is parked inside the gate handler; this burst lands together
  actor.enqueue(normal_item(1), None);
  actor.enqueue(high_priority_item(2), None);
  actor.enqueue(normal_item(3), None);
  actor.enqueue(high_priority_item(4), None);
  release.count_down();
  assert!(done.wait_timeout(Duration::from_secs(5)));
  assert_eq!(order.lock().clone(), vec![2, 4, 1, 3]);
  system.shutdown();
}
