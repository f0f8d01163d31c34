use crate::{actor_context::ActorContext, behavior::Behavior, error::Error, group::Group, spawn_options::SpawnOptions};

pub(crate) type InitFn = Box<dyn FnOnce(&mut ActorContext<'_>) -> Behavior + Send>;
pub(crate) type ActFn = Box<dyn FnOnce(&mut ActorContext<'_>) -> Result<(), Error> + Send>;

/// Construction recipe for an actor.
///
/// Event-based actors provide an initial-behavior factory; blocking actors
/// provide a single `act` step function and always run detached.
pub struct ActorConfig {
  init: Option<InitFn>,
  act: Option<ActFn>,
  options: SpawnOptions,
  name: Option<String>,
  groups: Vec<Group>,
}

impl ActorConfig {
  /// Creates the configuration of an event-based actor.
  #[must_use]
  pub fn from_behavior<F>(init: F) -> Self
  where
    F: FnOnce(&mut ActorContext<'_>) -> Behavior + Send + 'static, {
    Self { init: Some(Box::new(init)), act: None, options: SpawnOptions::new(), name: None, groups: Vec::new() }
  }

  /// Creates the configuration of a blocking actor.
  ///
  /// Returning `Err(reason)` from the step function terminates the actor
  /// with that reason, the equivalent of an unwinding `quit`.
  #[must_use]
  pub fn from_act<F>(act: F) -> Self
  where
    F: FnOnce(&mut ActorContext<'_>) -> Result<(), Error> + Send + 'static, {
    Self {
      init: None,
      act: Some(Box::new(act)),
      options: SpawnOptions::new().detached(),
      name: None,
      groups: Vec::new(),
    }
  }

  /// Replaces the spawn options.
  #[must_use]
  pub fn with_options(mut self, options: SpawnOptions) -> Self {
    self.options = if self.is_blocking() { options.detached() } else { options };
    self
  }

  /// Names the actor.
  #[must_use]
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Joins the actor to a group at construction time.
  #[must_use]
  pub fn in_group(mut self, group: Group) -> Self {
    self.groups.push(group);
    self
  }

  /// Returns `true` for blocking actors.
  #[must_use]
  pub const fn is_blocking(&self) -> bool {
    self.act.is_some()
  }

  /// Returns the spawn options.
  #[must_use]
  pub const fn options(&self) -> SpawnOptions {
    self.options
  }

  pub(crate) fn into_parts(self) -> (Option<InitFn>, Option<ActFn>, SpawnOptions, Option<String>, Vec<Group>) {
    (self.init, self.act, self.options, self.name, self.groups)
  }
}

impl core::fmt::Debug for ActorConfig {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ActorConfig")
      .field("blocking", &self.is_blocking())
      .field("options", &self.options)
      .field("name", &self.name)
      .finish()
  }
}
