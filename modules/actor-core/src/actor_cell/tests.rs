use core::time::Duration;

use super::ActorCell;
use crate::{
  actor_config::ActorConfig,
  actor_ref::ActorRef,
  actor_system::ActorSystem,
  behavior::Behavior,
  config::ActorSystemConfig,
  envelope::Envelope,
  error::Error,
  match_result::MatchResult,
  message_class::MessageClass,
  message_id::MessageId,
  payload::Payload,
  spawn_options::SpawnOptions,
  timeout_msg::TimeoutMsg,
};

fn test_system() -> ActorSystem {
  ActorSystem::new(ActorSystemConfig::new().with_scheduler_threads(1))
}

fn quiet_actor(system: &ActorSystem) -> ActorRef {
  system.spawn(
    ActorConfig::from_behavior(|_| Behavior::new(|_, _| MatchResult::Consumed))
      .with_options(SpawnOptions::new().lazy_init()),
  )
}

#[test]
fn credit_grant_reseeds_sources_at_the_watermark() {
  let system = ActorSystem::new(
    ActorSystemConfig::new()
      .with_open_credit(4)
      .with_low_watermark(1)
      .with_max_credit(4)
      .with_scheduler_threads(1),
  );
  let sink = quiet_actor(&system);
  let source_a = quiet_actor(&system);
  let source_b = quiet_actor(&system);
  let cell = sink.cell();
  {
    let mut state = cell.state.lock();
    state.sources.insert(source_a.addr(), 0);
    state.sources.insert(source_b.addr(), 0);
    // four items consumed, none acknowledged yet
    state.open_credit = 0;
    assert_eq!(state.in_flight(), 4);
    cell.grant_credit(&mut state, None, 3, None);
    assert_eq!(state.open_credit, 1);
    assert_eq!(state.sources.values().sum::<u64>(), 2);
  }
  system.shutdown();
}

#[test]
fn credit_is_conserved_without_source_deaths() {
  let system = test_system();
  let sink = quiet_actor(&system);
  let source_a = quiet_actor(&system);
  let source_b = quiet_actor(&system);
  let cell = sink.cell();
  {
    let mut state = cell.state.lock();
    state.sources.insert(source_a.addr(), 0);
    state.sources.insert(source_b.addr(), 0);
    let max = state.max_credit;
    cell.grant_credit(&mut state, None, 0, None);
    assert_eq!(state.open_credit + state.sources.values().sum::<u64>(), max);
    cell.grant_credit(&mut state, None, 5, Some(source_a.addr()));
    assert_eq!(state.open_credit + state.sources.values().sum::<u64>(), max);
    cell.grant_credit(&mut state, None, 0, None);
    assert_eq!(state.open_credit + state.sources.values().sum::<u64>(), max);
  }
  system.shutdown();
}

#[test]
fn watermark_gating_emits_grants_when_in_flight_is_low() {
  let system = test_system();
  let sink = quiet_actor(&system);
  let source = quiet_actor(&system);
  let cell = sink.cell();
  {
    let mut state = cell.state.lock();
    state.sources.insert(source.addr(), 0);
    // in_flight == 0 <= low watermark, pool is full
    let before = state.sources.values().sum::<u64>();
    cell.grant_credit(&mut state, None, 0, None);
    let after = state.sources.values().sum::<u64>();
    assert!(after > before);
    assert_eq!(state.open_credit, 0);
  }
  system.shutdown();
}

#[test]
fn exhausted_cause_above_the_watermark_is_reseeded_with_the_pool() {
  let system = ActorSystem::new(
    ActorSystemConfig::new()
      .with_open_credit(50)
      .with_low_watermark(10)
      .with_max_credit(50)
      .with_scheduler_threads(1),
  );
  let sink = quiet_actor(&system);
  let source = quiet_actor(&system);
  let cell = sink.cell();
  {
    let mut state = cell.state.lock();
    state.sources.insert(source.addr(), 2);
    // 30 in flight keeps the ledger above the watermark
    state.open_credit = 20;
    cell.grant_credit(&mut state, None, 2, Some(source.addr()));
    // the cause ran dry and received the whole pool at once
    assert_eq!(state.open_credit, 0);
    assert_eq!(state.sources.get(&source.addr()).copied(), Some(22));
  }
  system.shutdown();
}

#[test]
fn dead_sources_return_their_credit_to_the_pool() {
  let system = test_system();
  let sink = quiet_actor(&system);
  let live = quiet_actor(&system);
  let cell = sink.cell();
  // the only strong handle of this source is dropped immediately
  let dead_addr = quiet_actor(&system).addr();
  assert!(dead_addr.upgrade().is_none());
  {
    let mut state = cell.state.lock();
    state.sources.insert(live.addr(), 0);
    state.sources.insert(dead_addr.clone(), 30);
    state.open_credit = 0;
    // returning 40 drops in-flight to the watermark and triggers compaction
    cell.grant_credit(&mut state, None, 40, None);
    assert!(!state.sources.contains_key(&dead_addr));
    // 40 + the dead source's 30 all went to the remaining live source
    assert_eq!(state.open_credit, 0);
    assert_eq!(state.sources.get(&live.addr()).copied(), Some(70));
  }
  system.shutdown();
}

#[test]
fn timeout_ids_are_monotonic_and_only_the_latest_is_active() {
  let system = test_system();
  let actor = quiet_actor(&system);
  let cell = actor.cell();
  {
    let mut state = cell.state.lock();
    let first = cell.request_timeout(&mut state, None, Some(Duration::from_secs(60)));
    let first_active = state.timeout_id;
    assert!(ActorCell::is_active_timeout(&state, first_active));
    let second = cell.request_timeout(&mut state, None, Some(Duration::from_secs(60)));
    assert!(second > first);
    assert!(!ActorCell::is_active_timeout(&state, first_active));
    assert!(ActorCell::is_active_timeout(&state, state.timeout_id));
    // deliveries carrying a stale id classify as expired
    let mut stale =
      Envelope::make(None, MessageId::asynchronous(), Vec::new(), Payload::Timeout(TimeoutMsg { timeout_id: first_active }));
    assert_eq!(cell.filter_envelope(&mut state, None, &mut stale), MessageClass::ExpiredTimeout);
    let mut current =
      Envelope::make(None, MessageId::asynchronous(), Vec::new(), Payload::Timeout(TimeoutMsg { timeout_id: state.timeout_id }));
    assert_eq!(cell.filter_envelope(&mut state, None, &mut current), MessageClass::Timeout);
  }
  system.shutdown();
}

#[test]
fn invalid_timeout_clears_the_armed_one() {
  let system = test_system();
  let actor = quiet_actor(&system);
  let cell = actor.cell();
  {
    let mut state = cell.state.lock();
    let _ = cell.request_timeout(&mut state, None, Some(Duration::from_secs(60)));
    assert!(state.has_timeout);
    let cleared = cell.request_timeout(&mut state, None, None);
    assert_eq!(cleared, 0);
    assert!(!state.has_timeout);
  }
  system.shutdown();
}

#[test]
fn awaited_handlers_are_serviced_most_recent_first() {
  let system = test_system();
  let actor = quiet_actor(&system);
  let cell = actor.cell();
  {
    let mut state = cell.state.lock();
    let first = MessageId::request(1).response_id();
    let second = MessageId::request(2).response_id();
    ActorCell::set_awaited_response_handler(&mut state, first, Behavior::new(|_, _| MatchResult::Consumed));
    ActorCell::set_awaited_response_handler(&mut state, second, Behavior::new(|_, _| MatchResult::Consumed));
    assert_eq!(state.awaited_responses.first().map(|(mid, _)| *mid), Some(second));
    // replacing an id keeps a single entry
    let replacement = Behavior::new(|_, _| MatchResult::Consumed);
    ActorCell::set_awaited_response_handler(&mut state, first, replacement.clone());
    assert_eq!(state.awaited_responses.len(), 2);
    assert_eq!(ActorCell::find_awaited_response(&state, first), Some(replacement));
    ActorCell::mark_awaited_arrived(&mut state, first);
    assert_eq!(state.awaited_responses.len(), 1);
  }
  system.shutdown();
}

#[test]
fn cleanup_runs_at_most_once() {
  let system = test_system();
  let actor = quiet_actor(&system);
  assert_eq!(system.registered_count(), 1);
  let cell = actor.cell();
  {
    let mut state = cell.state.lock();
    cell.cleanup(&mut state, None, Error::Custom(String::from("first")));
    assert!(cell.is_cleaned_up());
    cell.cleanup(&mut state, None, Error::Custom(String::from("second")));
  }
  assert_eq!(cell.fail_state(), Error::Custom(String::from("first")));
  assert_eq!(system.registered_count(), 0);
  assert!(cell.mailbox().is_closed());
  system.shutdown();
}
