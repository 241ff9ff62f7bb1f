//! # dgl-sync
//!
//! Ties the cache, the liveness probe and the link service together.
//! [`Reconciler::reconcile`] takes a raw dropped path and returns a record
//! whose public URL is known to work, creating the Dropbox share if needed.

pub mod error;
pub mod reconcile;

pub use error::ReconcileError;
pub use reconcile::{Outcome, Reconciled, Reconciler};
