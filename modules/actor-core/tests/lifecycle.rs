use core::time::Duration;

use troupe_actor_core_rs::{
  ActorConfig, ActorRef, ActorSystem, ActorSystemConfig, AnyMessage, Behavior, Error, Group, MatchResult,
};
use troupe_utils_core_rs::{
  concurrent::CountDownLatch,
  sync::{ArcShared, SpinSyncMutex},
};

struct Die;
struct Ping;
struct Explode;

fn test_system() -> ActorSystem {
  ActorSystem::new(ActorSystemConfig::new().with_scheduler_threads(2))
}

fn await_cleanup(actor: &ActorRef) {
  let deadline = std::time::Instant::now() + Duration::from_secs(5);
  while !actor.is_cleaned_up() {
    assert!(std::time::Instant::now() < deadline, "actor never terminated");
    std::thread::sleep(Duration::from_millis(1));
  }
}

#[test]
fn terminating_actors_leave_their_groups() {
  let system = test_system();
  let group = Group::new("workers");
  let member = system.spawn(
    ActorConfig::from_behavior(|_| {
      Behavior::new(|ctx, payload| {
        if payload.downcast_user::<Die>().is_some() {
          ctx.quit(Error::Normal);
          return MatchResult::Consumed;
        }
        MatchResult::NoMatch
      })
    })
    .in_group(group.clone()),
  );
  assert_eq!(group.len(), 1);
  member.tell(AnyMessage::new(Die));
  await_cleanup(&member);
  assert!(group.is_empty());
  system.shutdown();
}

#[test]
fn exit_messages_with_a_normal_reason_are_ignored() {
  let system = test_system();
  let pings = ArcShared::new(SpinSyncMutex::new(0_u32));
  let latch = ArcShared::new(CountDownLatch::new(1));
  let survivor = {
    let pings = pings.clone();
    let latch = latch.clone();
    system.spawn(ActorConfig::from_behavior(move |_| {
      let pings = pings.clone();
      let latch = latch.clone();
      Behavior::new(move |_, payload| {
        if payload.downcast_user::<Ping>().is_some() {
          *pings.lock() += 1;
          latch.count_down();
          return MatchResult::Consumed;
        }
        MatchResult::NoMatch
      })
    }))
  };
  let _sender = {
    let survivor = survivor.clone();
    system.spawn(ActorConfig::from_behavior(move |ctx| {
      ctx.send_exit(&survivor, Error::Normal);
      ctx.send(&survivor, Ping);
      Behavior::new(|_, _| MatchResult::Consumed)
    }))
  };
  assert!(latch.wait_timeout(Duration::from_secs(5)));
  assert_eq!(*pings.lock(), 1);
  assert!(!survivor.is_cleaned_up());
  system.shutdown();
}

#[test]
fn panicking_handlers_terminate_with_unhandled_exception() {
  let system = test_system();
  let victim = system.spawn(ActorConfig::from_behavior(|_| {
    Behavior::new(|_, payload| {
      if payload.downcast_user::<Explode>().is_some() {
        panic!("handler blew up");
      }
      MatchResult::NoMatch
    })
  }));
  let down = ArcShared::new(SpinSyncMutex::new(None));
  let latch = ArcShared::new(CountDownLatch::new(1));
  let _observer = {
    let down = down.clone();
    let latch = latch.clone();
    let victim = victim.clone();
    system.spawn(ActorConfig::from_behavior(move |ctx| {
      ctx.monitor(&victim);
      let down = down.clone();
      let latch = latch.clone();
      ctx.set_down_handler(move |_, message| {
        down.lock().replace(message.reason);
        latch.count_down();
      });
      Behavior::new(|_, _| MatchResult::Consumed)
    }))
  };
  victim.tell(AnyMessage::new(Explode));
  assert!(latch.wait_timeout(Duration::from_secs(5)));
  assert_eq!(down.lock().clone(), Some(Error::UnhandledException));
  assert_eq!(victim.fail_state(), Error::UnhandledException);
  system.shutdown();
}

#[test]
fn exception_handlers_can_rewrite_the_exit_reason() {
  let system = test_system();
  let victim = system.spawn(ActorConfig::from_behavior(|ctx| {
    ctx.set_exception_handler(|_| Some(Error::Custom(String::from("mapped"))));
    Behavior::new(|_, payload| {
      if payload.downcast_user::<Explode>().is_some() {
        panic!("handler blew up");
      }
      MatchResult::NoMatch
    })
  }));
  victim.tell(AnyMessage::new(Explode));
  await_cleanup(&victim);
  assert_eq!(victim.fail_state(), Error::Custom(String::from("mapped")));
  system.shutdown();
}
