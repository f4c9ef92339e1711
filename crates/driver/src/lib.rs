//! Datascope automation driver
//!
//! Synchronization and command-composition layer over a remote
//! window-automation endpoint. The wire protocol is not implemented
//! here; anything that can answer the [`RemoteClient`] primitives can be
//! driven.
//!
//! # Architecture
//!
//! ```text
//! Session (chain context)
//!   ├── RemoteClient        primitive clicks, values, window queries
//!   ├── wait_until          polling engine behind every wait helper
//!   ├── wait_for_window     new-window detection + focus switch
//!   ├── run_sequence        ordered, guard-filtered, fail-fast steps
//!   └── CommandRegistry     named commands, resolved at invoke time
//! ```
//!
//! Reliability comes from polling inside a single wait, not from
//! retrying whole scenarios: a timed-out wait fails its scenario with
//! the elapsed time and what was being waited for.

pub mod client;
pub mod error;
pub mod registry;
pub mod sequence;
pub mod session;
pub mod testkit;
pub mod wait;
pub mod window;

pub use client::{RemoteClient, WindowHandle};
pub use error::{Error, Result};
pub use registry::{CommandArgs, CommandFuture, CommandHandler, CommandRegistry};
pub use sequence::{Sequence, StepAction};
pub use session::Session;
pub use wait::{wait_until, WaitOptions, DEFAULT_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
pub use window::wait_for_window;
