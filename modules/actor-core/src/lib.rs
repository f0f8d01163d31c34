#![deny(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone))]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::missing_safety_doc)]
#![cfg_attr(not(test), deny(clippy::redundant_clone))]
#![deny(clippy::redundant_field_names)]
#![deny(clippy::needless_borrow)]
#![deny(clippy::manual_ok_or)]
#![deny(clippy::manual_map)]
#![deny(clippy::manual_let_else)]
#![deny(clippy::unused_self)]
#![deny(clippy::unnecessary_wraps)]
#![deny(dropping_copy_types)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::print_stdout)]
#![deny(clippy::dbg_macro)]
#![deny(clippy::must_use_candidate)]
#![allow(unknown_lints)]

//! Per-actor execution engine.
//!
//! This crate implements the core of the troupe actor runtime: the concurrent
//! mailbox with its blocked/closed state machine, priority reassembly and the
//! skipped-message cache, the behavior stack with timeouts, awaited and
//! multiplexed response correlation, credit-based flow control over upstream
//! sources, and the `resume` dispatch loop shared by cooperatively scheduled
//! and privately threaded actors.

mod actor_addr;
mod actor_cell;
mod actor_config;
mod actor_context;
mod actor_ref;
mod actor_system;
mod any_message;
mod attachment;
mod behavior;
mod behavior_stack;
mod config;
mod down_msg;
mod enqueue_outcome;
mod envelope;
mod error;
mod execution_unit;
mod exit_msg;
mod group;
mod info_response;
mod invoke_outcome;
mod mailbox;
mod mailbox_cache;
mod match_result;
mod message_class;
mod message_id;
mod message_priority;
mod payload;
mod private_thread;
mod request_bouncer;
mod response_promise;
mod resumable;
mod resume_result;
mod scheduler;
mod spawn_options;
mod stream_handle;
mod sys_message;
mod timeout_msg;

pub use actor_addr::ActorAddr;
pub use actor_cell::ActorCell;
pub use actor_config::ActorConfig;
pub use actor_context::ActorContext;
pub use actor_ref::ActorRef;
pub use actor_system::ActorSystem;
pub use any_message::AnyMessage;
pub use behavior::Behavior;
pub use behavior_stack::BehaviorStack;
pub use config::ActorSystemConfig;
pub use down_msg::DownMsg;
pub use enqueue_outcome::EnqueueOutcome;
pub use envelope::Envelope;
pub use error::Error;
pub use execution_unit::ExecutionUnit;
pub use exit_msg::ExitMsg;
pub use group::Group;
pub use info_response::InfoResponse;
pub use invoke_outcome::InvokeOutcome;
pub use mailbox::Mailbox;
pub use match_result::MatchResult;
pub use message_class::MessageClass;
pub use message_id::MessageId;
pub use message_priority::MessagePriority;
pub use payload::Payload;
pub use response_promise::ResponsePromise;
pub use resumable::Resumable;
pub use resume_result::ResumeResult;
pub use scheduler::Scheduler;
pub use spawn_options::SpawnOptions;
pub use stream_handle::StreamHandle;
pub use sys_message::SysMessage;
pub use timeout_msg::TimeoutMsg;
