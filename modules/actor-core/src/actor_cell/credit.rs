use super::{ActorCell, CellState};
use crate::{
  actor_addr::ActorAddr, actor_ref::ActorRef, envelope::Envelope, execution_unit::ExecutionUnit,
  message_id::MessageId, payload::Payload, sys_message::SysMessage,
};

impl ActorCell {
  /// Returns credit to the pool and redistributes it upstream.
  ///
  /// `cause` names the source whose message was just consumed, if any. A
  /// cause that ran dry while the ledger sits above the watermark is re-seeded
  /// with the entire pool at once; otherwise grants wait until in-flight
  /// traffic falls to the low watermark and are then split across all live
  /// sources. Dead sources return their credit to the pool during the split.
  pub(crate) fn grant_credit(
    &self,
    state: &mut CellState,
    eu: Option<&dyn ExecutionUnit>,
    newly_available: u64,
    cause: Option<ActorAddr>,
  ) {
    state.open_credit += newly_available;
    let above_low_watermark = state.in_flight() > state.low_watermark;
    if let Some(cause) = cause {
      if let Some(credit) = state.sources.get_mut(&cause) {
        *credit = credit.saturating_sub(newly_available);
        if *credit == 0 && above_low_watermark {
          if let Some(target) = cause.upgrade() {
            *credit = state.open_credit;
            let grant = state.open_credit;
            state.open_credit = 0;
            self.send_demand(&target, grant, eu);
          }
          return;
        }
      }
    }
    if above_low_watermark || state.sources.is_empty() {
      return;
    }
    // compact dead sources, returning their credit to the pool
    let mut live: Vec<(ActorAddr, ActorRef)> = Vec::new();
    let mut reclaimed = 0_u64;
    state.sources.retain(|addr, credit| match addr.upgrade() {
      | Some(target) => {
        live.push((addr.clone(), target));
        true
      },
      | None => {
        reclaimed += *credit;
        false
      },
    });
    state.open_credit += reclaimed;
    if live.is_empty() || state.open_credit == 0 {
      return;
    }
    // make sure at least some sources advance when the pool cannot be split
    // across all of them
    let mut per_source = state.open_credit / live.len() as u64;
    while per_source == 0 {
      live.pop();
      per_source = state.open_credit / live.len() as u64;
    }
    for (addr, target) in &live {
      if let Some(credit) = state.sources.get_mut(addr) {
        *credit += per_source;
      }
      self.send_demand(target, per_source, eu);
    }
    state.open_credit -= per_source * live.len() as u64;
  }

  pub(crate) fn send_demand(&self, target: &ActorRef, amount: u64, eu: Option<&dyn ExecutionUnit>) {
    tracing::debug!(actor = self.id(), source = target.id(), amount, "granting credit upstream");
    let envelope = Envelope::make(
      self.strong_ref(),
      MessageId::asynchronous(),
      Vec::new(),
      Payload::Sys(SysMessage::Demand(amount)),
    );
    target.enqueue(envelope, eu);
  }
}
