use core::any::Any;

use crate::{
  any_message::AnyMessage, down_msg::DownMsg, error::Error, exit_msg::ExitMsg, sys_message::SysMessage,
  timeout_msg::TimeoutMsg,
};

/// Message content carried by an [`crate::envelope::Envelope`].
///
/// System traffic uses a closed set of tagged variants; user traffic stays
/// dynamically typed behind [`AnyMessage`].
#[derive(Clone, Debug)]
pub enum Payload {
  /// Ordinary user message or request content.
  User(AnyMessage),
  /// Error content, e.g. a failed response.
  Fail(Error),
  /// System request handled by the message filter.
  Sys(SysMessage),
  /// Behavior timeout delivery.
  Timeout(TimeoutMsg),
  /// Elapsed sync-style request timer.
  SyncTimeout,
  /// Exit notification.
  Exit(ExitMsg),
  /// Monitor notification.
  Down(DownMsg),
}

impl Payload {
  /// Wraps a typed value as an ordinary user payload.
  #[must_use]
  pub fn user<T>(value: T) -> Self
  where
    T: Any + Send + Sync + 'static, {
    Self::User(AnyMessage::new(value))
  }

  /// Returns the empty user payload.
  #[must_use]
  pub fn empty() -> Self {
    Self::User(AnyMessage::unit())
  }

  /// Returns `true` for the empty user payload.
  #[must_use]
  pub fn is_empty_user(&self) -> bool {
    matches!(self, Self::User(msg) if msg.is_unit())
  }

  /// Attempts to view an ordinary payload as a value of type `T`.
  #[must_use]
  pub fn downcast_user<T: Any>(&self) -> Option<&T> {
    match self {
      | Self::User(msg) => msg.downcast_ref::<T>(),
      | _ => None,
    }
  }
}
