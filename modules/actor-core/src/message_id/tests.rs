use proptest::prelude::*;

use super::MessageId;
use crate::message_priority::MessagePriority;

#[test]
fn asynchronous_id_is_invalid() {
  let mid = MessageId::asynchronous();
  assert!(!mid.is_valid());
  assert!(!mid.is_request());
  assert!(!mid.is_response());
  assert!(mid.is_async());
}

#[test]
fn request_ids_carry_their_sequence() {
  let mid = MessageId::request(42);
  assert!(mid.is_valid());
  assert!(mid.is_request());
  assert!(!mid.is_response());
  assert_eq!(mid.sequence(), 42);
}

#[test]
fn response_id_swaps_the_category_and_keeps_the_rest() {
  let request = MessageId::request(7).with_high_priority().with_flow_control();
  let response = request.response_id();
  assert!(response.is_response());
  assert!(!response.is_request());
  assert!(response.is_high_priority());
  assert!(response.is_flow_controlled());
  assert_eq!(response.sequence(), 7);
}

#[test]
fn response_id_is_idempotent_on_responses() {
  let response = MessageId::request(3).response_id();
  assert_eq!(response.response_id(), response);
}

#[test]
fn response_id_of_async_messages_is_invalid() {
  assert!(!MessageId::asynchronous().response_id().is_valid());
}

#[test]
fn priority_can_be_toggled() {
  let mid = MessageId::request(1).with_priority(MessagePriority::High);
  assert!(mid.is_high_priority());
  assert!(!mid.with_priority(MessagePriority::Normal).is_high_priority());
}

#[test]
fn answered_bit_survives_priority_changes() {
  let mid = MessageId::request(5).mark_answered().with_high_priority();
  assert!(mid.is_answered());
}

proptest! {
  #[test]
  fn value_round_trips(value in any::<u64>()) {
    prop_assert_eq!(MessageId::from_value(value).value(), value);
  }

  #[test]
  fn distinct_sequences_give_distinct_response_ids(a in 1_u64..MessageId::SEQUENCE_MASK, b in 1_u64..MessageId::SEQUENCE_MASK) {
    prop_assume!(a != b);
    prop_assert_ne!(MessageId::request(a).response_id(), MessageId::request(b).response_id());
  }

  #[test]
  fn response_ids_are_deterministic(sequence in 1_u64..MessageId::SEQUENCE_MASK) {
    let request = MessageId::request(sequence);
    prop_assert_eq!(request.response_id(), request.response_id());
    prop_assert!(request.response_id().is_response());
  }
}
