use crate::{actor_addr::ActorAddr, error::Error};

/// Notifies a monitoring actor that an observed actor terminated.
#[derive(Clone, Debug)]
pub struct DownMsg {
  /// Address of the terminated actor.
  pub source: ActorAddr,
  /// Fail state the actor terminated with.
  pub reason: Error,
}
