//! Shared-ownership handles and mutex abstractions.

mod arc_shared;
mod weak_shared;

pub mod sync_mutex_like;

pub use arc_shared::ArcShared;
pub use sync_mutex_like::{SpinSyncMutex, SyncMutexLike};
pub use weak_shared::WeakShared;
