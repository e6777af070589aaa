//! # Ordered-Collection Reconciliation
//!
//! Brings a remote ordered collection (a playlist) into agreement with
//! a locally computed desired ordering, using a minimal edit script
//! derived from a Longest Common Subsequence.
//!
//! ## Overview
//!
//! The observed ordering is fetched fresh from the remote before every
//! reconciliation, an edit script of deletes and inserts is computed,
//! and the script is applied with all deletes strictly before any
//! insert. The script is minimal: every element present and correctly
//! ordered on both sides is left untouched.
//!
//! Application is not atomic against the remote service. A failed call
//! aborts the remainder of that collection's script, and rerunning
//! `reconcile` is always safe because the plan is recomputed from the
//! then-current observed state.

pub mod error;
pub mod lcs;
pub mod reconciler;
pub mod script;

pub use error::{ReconcileError, Result};
pub use reconciler::{CollectionApi, PlaylistReconciler, ReconcilePlan};
pub use script::{compute_script, CollectionItem, EditOp, EditScript};
