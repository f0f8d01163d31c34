/// Runtime configuration consumed by the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorSystemConfig {
  open_credit: u64,
  low_watermark: u64,
  max_credit: u64,
  scheduler_max_throughput: usize,
  scheduler_threads: usize,
}

impl ActorSystemConfig {
  /// Creates the default configuration.
  #[must_use]
  pub fn new() -> Self {
    let threads = std::thread::available_parallelism().map(usize::from).unwrap_or(4);
    Self {
      open_credit: 50,
      low_watermark: 10,
      max_credit: 50,
      scheduler_max_throughput: 300,
      scheduler_threads: threads,
    }
  }

  /// Sets the initially unassigned credit.
  #[must_use]
  pub const fn with_open_credit(mut self, value: u64) -> Self {
    self.open_credit = value;
    self
  }

  /// Sets the threshold below which credit is redistributed upstream.
  #[must_use]
  pub const fn with_low_watermark(mut self, value: u64) -> Self {
    self.low_watermark = value;
    self
  }

  /// Sets the maximum number of in-flight flow-controlled messages.
  #[must_use]
  pub const fn with_max_credit(mut self, value: u64) -> Self {
    self.max_credit = value;
    self
  }

  /// Sets the per-resume message budget of scheduled actors.
  #[must_use]
  pub const fn with_scheduler_max_throughput(mut self, value: usize) -> Self {
    self.scheduler_max_throughput = value;
    self
  }

  /// Sets the worker pool size.
  #[must_use]
  pub const fn with_scheduler_threads(mut self, value: usize) -> Self {
    self.scheduler_threads = value;
    self
  }

  /// Returns the initially unassigned credit.
  #[must_use]
  pub const fn open_credit(&self) -> u64 {
    self.open_credit
  }

  /// Returns the redistribution threshold.
  #[must_use]
  pub const fn low_watermark(&self) -> u64 {
    self.low_watermark
  }

  /// Returns the in-flight ceiling.
  #[must_use]
  pub const fn max_credit(&self) -> u64 {
    self.max_credit
  }

  /// Returns the per-resume message budget.
  #[must_use]
  pub const fn scheduler_max_throughput(&self) -> usize {
    self.scheduler_max_throughput
  }

  /// Returns the worker pool size.
  #[must_use]
  pub const fn scheduler_threads(&self) -> usize {
    self.scheduler_threads
  }
}

impl Default for ActorSystemConfig {
  fn default() -> Self {
    Self::new()
  }
}
