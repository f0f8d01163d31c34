/// Delivery of a behavior timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeoutMsg {
  /// Id of the timeout this message belongs to. Deliveries carrying anything
  /// other than the currently active id are classified as expired.
  pub timeout_id: u32,
}
