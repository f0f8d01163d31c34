use crate::actor_addr::ActorAddr;

/// System requests handled by the message filter before regular dispatch.
#[derive(Clone, Debug)]
pub enum SysMessage {
  /// `(sys, get, key)`: runtime introspection; only `"info"` is known.
  Get(String),
  /// `(sys, get, n)`: instructs the receiver to run the sender's generator
  /// up to `n` times. Sent by sinks to grant credit upstream.
  Demand(u64),
  /// `(sys, addSource)`: registers the sender as a flow-controlled source.
  AddSource,
  /// `(sys, delSource, addr)`: releases a source and its remaining credit.
  DelSource(ActorAddr),
}
