use proptest::prelude::*;

use super::MailboxCache;
use crate::{envelope::Envelope, mailbox::Mailbox, message_id::MessageId, payload::Payload};

fn envelope(tag: u32, high_priority: bool) -> Envelope {
  let mid = if high_priority {
    MessageId::asynchronous().with_high_priority()
  } else {
    MessageId::asynchronous()
  };
  Envelope::make(None, mid, Vec::new(), Payload::user(tag))
}

fn tag_of(envelope: &Envelope) -> u32 {
  *envelope.payload().downcast_user::<u32>().expect("tag payload")
}

fn drain_first(cache: &mut MailboxCache) -> Vec<(u32, bool)> {
  let mut result = Vec::new();
  while let Some(envelope) = cache.pop_first_front() {
    result.push((tag_of(&envelope), envelope.is_high_priority()));
  }
  result
}

#[test]
fn refill_partitions_high_before_low() {
  let mailbox = Mailbox::new();
  let _ = mailbox.enqueue(envelope(0, true));
  let _ = mailbox.enqueue(envelope(1, false));
  let _ = mailbox.enqueue(envelope(2, true));
  let _ = mailbox.enqueue(envelope(3, false));
  let _ = mailbox.enqueue(envelope(4, true));
  let mut cache = MailboxCache::default();
  cache.refill_first(&mailbox);
  let order: Vec<u32> = drain_first(&mut cache).into_iter().map(|(tag, _)| tag).collect();
  assert_eq!(order, vec![0, 2, 4, 1, 3]);
}

#[test]
fn refill_is_skipped_while_the_front_is_high_priority() {
  let mailbox = Mailbox::new();
  let _ = mailbox.enqueue(envelope(0, true));
  let mut cache = MailboxCache::default();
  cache.refill_first(&mailbox);
  // front is high priority; a second refill must not touch the mailbox
  let _ = mailbox.enqueue(envelope(1, true));
  cache.refill_first(&mailbox);
  assert!(mailbox.can_fetch_more());
  assert_eq!(drain_first(&mut cache).len(), 1);
}

#[test]
fn skipped_high_priority_envelopes_keep_the_partition_stable() {
  let mut cache = MailboxCache::default();
  cache.insert_second_partitioned(envelope(0, false));
  cache.insert_second_partitioned(envelope(1, true));
  cache.insert_second_partitioned(envelope(2, false));
  cache.insert_second_partitioned(envelope(3, true));
  let mut order = Vec::new();
  while let Some(envelope) = cache.second_remove(0) {
    order.push(tag_of(&envelope));
  }
  assert_eq!(order, vec![1, 3, 0, 2]);
}

proptest! {
  /// Within one pull cycle every high-priority envelope precedes every
  /// low-priority one, and relative order per priority class stays FIFO.
  #[test]
  fn refill_orders_one_pull_cycle(priorities in proptest::collection::vec(any::<bool>(), 0..64)) {
    let mailbox = Mailbox::new();
    for (tag, high) in priorities.iter().enumerate() {
      let _ = mailbox.enqueue(envelope(tag as u32, *high));
    }
    let mut cache = MailboxCache::default();
    cache.refill_first(&mailbox);
    let drained = drain_first(&mut cache);
    prop_assert_eq!(drained.len(), priorities.len());
    // no low-priority envelope may precede a high-priority one
    let first_low = drained.iter().position(|(_, high)| !high).unwrap_or(drained.len());
    prop_assert!(drained[first_low..].iter().all(|(_, high)| !high));
    // FIFO per class
    let highs: Vec<u32> = drained.iter().filter(|(_, high)| *high).map(|(tag, _)| *tag).collect();
    let lows: Vec<u32> = drained.iter().filter(|(_, high)| !high).map(|(tag, _)| *tag).collect();
    let mut sorted_highs = highs.clone();
    sorted_highs.sort_unstable();
    let mut sorted_lows = lows.clone();
    sorted_lows.sort_unstable();
    prop_assert_eq!(highs, sorted_highs);
    prop_assert_eq!(lows, sorted_lows);
  }
}
