//! # Atrium Directory Gateway
//!
//! This crate provides typed access to the tenant directory store: the
//! persistent system of record for organizations, memberships, and
//! per-organization configuration.
//!
//! ## Overview
//!
//! The atrium-directory crate handles:
//! - **Gateway**: The [`DirectoryGateway`] trait, a typed request/response
//!   wrapper around the store
//! - **Changes**: Push-style [`DirectoryChange`] notifications consumed as
//!   triggers for a fresh resolution pass (never as field patches)
//! - **Errors**: Typed [`DirectoryError`] values; the gateway surfaces
//!   failures instead of blocking indefinitely
//! - **Retry**: Exponential backoff for transient store failures
//! - **Memory backend**: An in-memory implementation for tests and
//!   single-process deployments
//!
//! ## Invariants enforced at this layer
//!
//! - At most one organization has `is_master = true`
//! - One membership per (organization, principal) pair; duplicate creation
//!   fails with a typed error
//! - Organization creation and the founding owner membership are one
//!   logical transaction: a failure leaves neither behind

pub mod change;
pub mod error;
pub mod gateway;
pub mod retry;

#[cfg(feature = "memory")]
pub mod memory;

// Re-export main types for convenience
pub use change::DirectoryChange;
pub use error::{DirectoryError, DirectoryResult};
pub use gateway::DirectoryGateway;
#[cfg(feature = "memory")]
pub use memory::MemoryDirectory;
pub use retry::{with_retry, RetryConfig};
