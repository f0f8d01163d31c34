use core::any::Any;

use troupe_utils_core_rs::sync::ArcShared;

/// Owned representation of a dynamically typed user payload.
pub struct AnyMessage {
  payload: ArcShared<dyn Any + Send + Sync + 'static>,
}

impl AnyMessage {
  /// Creates a new owned message from the provided payload.
  #[must_use]
  pub fn new<T>(payload: T) -> Self
  where
    T: Any + Send + Sync + 'static, {
    Self { payload: ArcShared::new(payload).into_dyn(|value| value as &(dyn Any + Send + Sync + 'static)) }
  }

  /// Returns the empty message.
  ///
  /// An empty message carried by a flow-controlled envelope grants one credit
  /// back to the source; an empty response to an asynchronous request is
  /// suppressed.
  #[must_use]
  pub fn unit() -> Self {
    Self::new(())
  }

  /// Returns `true` when this is the empty message.
  #[must_use]
  pub fn is_unit(&self) -> bool {
    self.payload.downcast_ref::<()>().is_some()
  }

  /// Attempts to view the payload as a value of type `T`.
  #[must_use]
  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.payload.downcast_ref::<T>()
  }
}

impl Clone for AnyMessage {
  fn clone(&self) -> Self {
    Self { payload: self.payload.clone() }
  }
}

impl core::fmt::Debug for AnyMessage {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("AnyMessage").field("type_id", &self.payload.type_id()).finish()
  }
}
