#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Entry point crate for the troupe actor runtime workspace.
//!
//! Re-exports the workspace member crates under stable module names so that
//! applications depend on a single crate:
//!
//! - [`actor`]: the per-actor execution engine (mailbox, behavior stack,
//!   response correlation, credit-based flow control, dispatch).
//! - [`utils`]: the shared-ownership and synchronization primitives the
//!   engine builds on.

pub use troupe_actor_core_rs as actor;
pub use troupe_utils_core_rs as utils;
