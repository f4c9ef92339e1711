//! Datascope E2E Harness
//!
//! This crate provides the suite-facing half of the Datascope automation
//! stack:
//! - Launches the desktop client from a built bundle and waits for its
//!   control endpoint
//! - Models connection fixtures (YAML/JSON) with sentinel-aware
//!   authentication and TLS sections
//! - Ships the scenario catalogue (connect, collection selection, sample
//!   refinement, help navigation, feature-tour dismissal) and registers
//!   it as named commands on a driver session
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Test suite (setup/teardown)             │
//! ├─────────────────────────────────────────────────────────┤
//! │  start_application(dist_dir) -> AppHandle               │
//! │  AppHandle::attach(transport) -> Session                │
//! │  register_commands(&session)                            │
//! │  scenarios::goto_schema_window / select_collection / …  │
//! │  stop_application(app)                                  │
//! ├─────────────────────────────────────────────────────────┤
//! │  datascope-driver: Session, wait engine, sequencer,     │
//! │  window tracker, command registry                       │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod connect;
pub mod error;
pub mod scenarios;

pub use app::{start_application, stop_application, AppHandle, LaunchConfig};
pub use connect::{AuthCredentials, AuthMethod, ConnectRequest, SslMode, SslSettings};
pub use error::{HarnessError, Result};
pub use scenarios::register_commands;
