use crate::{execution_unit::ExecutionUnit, resume_result::ResumeResult};

/// Capability the scheduler uses to drive an actor.
///
/// Implementations dispatch up to `max_throughput` messages per call and
/// report how the scheduler should proceed.
pub trait Resumable: Send + Sync {
  /// Runs the job on the given execution unit.
  fn resume(&self, eu: Option<&dyn ExecutionUnit>, max_throughput: usize) -> ResumeResult;
}
