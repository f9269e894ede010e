//! # connector-sync core
//!
//! Keeps one remote connector in line with a declared configuration.
//!
//! ## Architecture
//!
//! ```text
//! resource.rs ── create / read / update / delete / test-config
//!      │
//!      └── reconcile.rs ── fetch ─► compare.rs ─► [no-op | update]
//!                │                      │
//!                │                      └── diff.rs (log only)
//!                └── connector-sync-client::Invoker ─► ConnectorRemote
//! ```
//!
//! [`compare`](compare::compare) walks only the desired side and decides
//! whether an update is sent. [`format_diff`](diff::format_diff) is the
//! symmetric report that gets logged when one is.

#![cfg_attr(
    test,
    allow(clippy::panic, clippy::print_stdout, clippy::assertions_on_result_states)
)]

pub mod compare;
pub mod diff;
pub mod error;
pub mod json;
pub mod logging;
pub mod reconcile;
pub mod resource;

pub use compare::{compare, Comparison, IgnoreSet};
pub use diff::{format_diff, ConfigDiff, DiffEntry};
pub use error::{CoreError, CoreResult, ReconcileError, ReconcilePhase};
pub use reconcile::{DesiredState, ReconcileOutcome, Reconciler};
pub use resource::{ConnectorResource, UpdateReport};
