use crate::{actor_addr::ActorAddr, error::Error};

/// Notifies an actor that a peer terminated or requested its termination.
#[derive(Clone, Debug)]
pub struct ExitMsg {
  /// Address of the terminating peer.
  pub source: ActorAddr,
  /// Termination reason; [`Error::Kill`] is always fatal.
  pub reason: Error,
}
