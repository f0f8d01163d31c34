use troupe_utils_core_rs::sync::ArcShared;

use crate::resumable::Resumable;

/// Execution context driving resumable jobs.
///
/// Scheduler workers implement this so that sends performed inside a handler
/// reschedule unblocked readers on the worker's own queue instead of going
/// through the home scheduler.
pub trait ExecutionUnit {
  /// Submits a job for later execution.
  fn exec_later(&self, job: ArcShared<dyn Resumable>);
}
