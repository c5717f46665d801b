//! Launchflow - approval-aware transaction workflows.
//!
//! Runs the state-changing actions of a token launchpad and AMM
//! (contribute, deposit, finalize, refund, withdraw, add and remove
//! liquidity) as two-phase workflows: an ERC-20 approval when the current
//! allowance is short, then the action itself.
//!
//! # Architecture
//!
//! - [`domain`] - Pure types: steps, runs, records, limits, modal and button
//!   projections, notification guard
//! - [`port`] - Chain and notifier traits
//! - [`application`] - Allowance tracking, approval submission, action
//!   adapters and the workflow engine
//! - [`adapter`] - CLI and the alloy-backed chain adapter (`evm` feature)
//! - [`infrastructure`] - Configuration and wiring
//!
//! # Features
//!
//! - `evm` (default) - Live chain adapter and the `launchflow` binary
//! - `testkit` - In-memory chain for tests
//!
//! # Example
//!
//! ```no_run
//! # use launchflow::application::workflow::ChainPorts;
//! # async fn demo(ports: ChainPorts) {
//! use std::sync::Arc;
//! use alloy_primitives::U256;
//! use launchflow::application::workflow::{EngineSettings, WorkflowEngine};
//! use launchflow::application::{ActionAdapter, ActionKind, ActionRequest, Contracts};
//! use launchflow::port::NullNotifier;
//!
//! let adapter = ActionAdapter::new(ActionKind::Contribute, &Contracts::default());
//! let engine = WorkflowEngine::new(
//!     adapter,
//!     &ports,
//!     Arc::new(NullNotifier),
//!     EngineSettings::default(),
//! );
//! let run = engine
//!     .start(ActionRequest::new(U256::from(1), U256::from(100)))
//!     .await
//!     .unwrap();
//! let outcome = engine.wait_for_outcome(run).await;
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
