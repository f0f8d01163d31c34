/// Error and exit-reason values surfaced by the runtime.
///
/// A single flat value doubles as an actor's fail state and as the payload of
/// error messages, so requesters always observe a terminal outcome of the
/// same shape regardless of how the request failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
  /// Regular termination without an error.
  Normal,
  /// No handler matched and the default handler dropped the message.
  UnexpectedMessage,
  /// A response arrived without a matching pending request.
  UnexpectedResponse,
  /// A sync-style request's timer elapsed before the response arrived.
  RequestTimeout,
  /// A handler panicked and the panic was caught at the dispatch boundary.
  UnhandledException,
  /// Exit reason that is always fatal.
  Kill,
  /// The actor was destroyed without having terminated.
  Unreachable,
  /// Unknown key in a `(sys, get, key)` request.
  UnsupportedSysKey,
  /// Application-defined reason.
  Custom(String),
}

impl Error {
  /// Returns `true` for the non-error termination reason.
  #[must_use]
  pub const fn is_normal(&self) -> bool {
    matches!(self, Self::Normal)
  }
}

impl core::fmt::Display for Error {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      | Self::Normal => f.write_str("normal"),
      | Self::UnexpectedMessage => f.write_str("unexpected message"),
      | Self::UnexpectedResponse => f.write_str("unexpected response"),
      | Self::RequestTimeout => f.write_str("request timeout"),
      | Self::UnhandledException => f.write_str("unhandled exception"),
      | Self::Kill => f.write_str("kill"),
      | Self::Unreachable => f.write_str("unreachable"),
      | Self::UnsupportedSysKey => f.write_str("unsupported sys key"),
      | Self::Custom(reason) => write!(f, "{reason}"),
    }
  }
}

impl std::error::Error for Error {}
