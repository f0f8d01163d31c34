use crate::behavior::Behavior;


/// LIFO of active message handlers.
///
/// Popped behaviors move to an erased list instead of being dropped
/// immediately: the behavior currently executing may pop itself, and its
/// closure must stay alive until the invocation returns. `cleanup` drops the
/// erased elements afterwards.
#[derive(Debug, Default)]
pub struct BehaviorStack {
  elements: Vec<Behavior>,
  erased: Vec<Behavior>,
}

impl BehaviorStack {
  /// Creates an empty stack.
  #[must_use]
  pub const fn new() -> Self {
    Self { elements: Vec::new(), erased: Vec::new() }
  }

  /// Returns `true` when no behavior is installed.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.elements.is_empty()
  }

  /// Returns the number of installed behaviors.
  #[must_use]
  pub fn len(&self) -> usize {
    self.elements.len()
  }

  /// Returns the behavior handling ordinary messages.
  #[must_use]
  pub fn back(&self) -> Option<&Behavior> {
    self.elements.last()
  }

  /// Installs a behavior on top of the stack.
  pub fn push_back(&mut self, behavior: Behavior) {
    self.elements.push(behavior);
  }

  /// Removes the top behavior, keeping it alive until [`BehaviorStack::cleanup`].
  pub fn pop_back(&mut self) {
    if let Some(behavior) = self.elements.pop() {
      self.erased.push(behavior);
    }
  }

  /// Moves every behavior to the erased list.
  pub fn clear(&mut self) {
    self.erased.append(&mut self.elements);
  }

  /// Drops behaviors erased since the last call.
  pub fn cleanup(&mut self) {
    self.erased.clear();
  }
}
