use super::Mailbox;
use crate::{enqueue_outcome::EnqueueOutcome, envelope::Envelope, message_id::MessageId, payload::Payload};

fn envelope(tag: u32) -> Envelope {
  Envelope::make(None, MessageId::asynchronous(), Vec::new(), Payload::user(tag))
}

fn tag_of(envelope: &Envelope) -> u32 {
  *envelope.payload().downcast_user::<u32>().expect("tag payload")
}

#[test]
fn enqueue_into_running_mailbox_succeeds() {
  let mailbox = Mailbox::new();
  assert!(matches!(mailbox.enqueue(envelope(1)), EnqueueOutcome::Success));
  assert!(mailbox.can_fetch_more());
  assert_eq!(mailbox.try_pop().map(|e| tag_of(&e)), Some(1));
  assert!(!mailbox.can_fetch_more());
}

#[test]
fn try_block_only_succeeds_on_an_empty_queue() {
  let mailbox = Mailbox::new();
  assert!(mailbox.try_block());
  let mailbox = Mailbox::new();
  let _ = mailbox.enqueue(envelope(1));
  assert!(!mailbox.try_block());
}

#[test]
fn enqueue_unblocks_a_blocked_reader_exactly_once() {
  let mailbox = Mailbox::new();
  assert!(mailbox.try_block());
  assert!(matches!(mailbox.enqueue(envelope(1)), EnqueueOutcome::UnblockedReader));
  assert!(matches!(mailbox.enqueue(envelope(2)), EnqueueOutcome::Success));
}

#[test]
fn pop_preserves_fifo_order() {
  let mailbox = Mailbox::new();
  for tag in 0..5_u32 {
    let _ = mailbox.enqueue(envelope(tag));
  }
  let mut seen = Vec::new();
  while let Some(envelope) = mailbox.try_pop() {
    seen.push(tag_of(&envelope));
  }
  assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[test]
fn close_drains_through_the_bouncer() {
  let mailbox = Mailbox::new();
  for tag in 0..3_u32 {
    let _ = mailbox.enqueue(envelope(tag));
  }
  let mut bounced = Vec::new();
  mailbox.close(|envelope| bounced.push(tag_of(&envelope)));
  assert_eq!(bounced, vec![0, 1, 2]);
  assert!(mailbox.is_closed());
  assert!(!mailbox.can_fetch_more());
}

#[test]
fn closed_mailbox_returns_the_envelope() {
  let mailbox = Mailbox::new();
  mailbox.close(|_| {});
  match mailbox.enqueue(envelope(9)) {
    | EnqueueOutcome::QueueClosed(rejected) => assert_eq!(tag_of(&rejected), 9),
    | other => panic!("expected QueueClosed, got {other:?}"),
  }
}

#[test]
fn closed_mailbox_cannot_block() {
  let mailbox = Mailbox::new();
  mailbox.close(|_| {});
  assert!(!mailbox.try_block());
}
