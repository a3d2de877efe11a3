//! # Scullery - Data Preparation Client
//!
//! Scullery is the desktop client for a four-stage data preparation
//! service: sign in, upload a CSV for analysis, run per-column
//! preprocessing, and export the cleaned result to a database. All heavy
//! lifting happens server-side; this crate owns the workflow state,
//! the wire contract, and the egui interface.
//!
//! ## Quick Start
//!
//! The heart of the crate is [`workflow::Workflow`], a synchronous state
//! machine that turns user intents into remote stage requests:
//!
//! ```no_run
//! use std::sync::Arc;
//! use scullery::session::SessionStore;
//! use scullery::workflow::{Intent, Reaction, Workflow};
//!
//! # fn main() -> scullery::error::Result<()> {
//! let store = Arc::new(SessionStore::open()?);
//! let mut workflow = Workflow::new(store);
//!
//! let reaction = workflow.handle_intent(Intent::SubmitLogin {
//!     username: "analyst".to_owned(),
//!     password: "secret".to_owned(),
//! });
//! assert!(matches!(reaction, Reaction::Start(_)));
//! # Ok(())
//! # }
//! ```
//!
//! The interface hands each [`workflow::StageRequest`] to an
//! [`api::Transport`] implementation on a worker thread and feeds the
//! [`workflow::StageOutcome`] back into the machine, which answers with a
//! [`view::ViewCommand`] telling the screens what to show next.
//!
//! ## Core Modules
//!
//! - [`workflow`]: the phase state machine orchestrating the four stages
//! - [`api`]: wire types and the HTTP client for the companion service
//! - [`gui`]: egui screens plus the background request controller
//! - [`view`]: render-ready projections handed to the interface
//! - [`session`]: durable storage for the bearer token
//! - [`error`]: error types shared across the crate
//! - [`logging`]: tracing setup with rotating file output

#![warn(clippy::all, rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod gui;
pub mod logging;
pub mod session;
pub mod theme;
pub mod utils;
pub mod view;
pub mod workflow;
