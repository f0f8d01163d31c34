use troupe_utils_core_rs::sync::ArcShared;

use super::SchedulerCore;
use crate::{execution_unit::ExecutionUnit, resumable::Resumable, resume_result::ResumeResult};

/// Execution unit identity of a pool worker.
pub(crate) struct WorkerContext {
  core: ArcShared<SchedulerCore>,
}

impl ExecutionUnit for WorkerContext {
  fn exec_later(&self, job: ArcShared<dyn Resumable>) {
    self.core.push(job);
  }
}

pub(crate) fn worker_loop(core: &ArcShared<SchedulerCore>) {
  let ctx = WorkerContext { core: core.clone() };
  while let Some(job) = core.pop() {
    match job.resume(Some(&ctx), core.max_throughput()) {
      | ResumeResult::ResumeLater => core.push(job),
      | ResumeResult::Done | ResumeResult::AwaitingMessage => {},
      | ResumeResult::Shutdown => return,
    }
  }
}
