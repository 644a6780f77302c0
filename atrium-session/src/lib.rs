//! # Atrium Tenant Session
//!
//! This crate is the reactive core of the Atrium dashboard: it resolves
//! which organizations an authenticated principal may act within, tracks
//! the selected ("current") organization per principal-device, layers
//! cross-tenant impersonation for platform administrators on top, and
//! exposes the derived capability set for the *effective* organization.
//!
//! ## Overview
//!
//! The atrium-session crate handles:
//! - **Resolution**: [`MembershipResolver`] loads memberships, performs
//!   domain auto-join, and produces the accessible organization set
//! - **Session**: [`TenantSession`] owns the per-principal-device state
//!   machine, mutated only through explicit commands
//! - **Impersonation**: the overlay that lets master-org admins view a
//!   tenant without holding a membership in it
//! - **Persistence**: [`SessionStore`] keeps the last-selected current
//!   organization per principal-device; impersonation is never persisted
//! - **Subscription**: a broadcast stream of [`SessionEvent`] values,
//!   emitted whenever the effective organization or permissions change
//!
//! ## Data flow
//!
//! ```text
//! Identity Provider ─→ MembershipResolver ─→ TenantSession ─→ Permissions
//!                       (memberships,          (current org,    (derived for
//!                        auto-join,             impersonation    the effective
//!                        full directory)        overlay)         organization)
//! ```
//!
//! Downstream features read only [`TenantSession::permissions`] and
//! [`TenantSession::effective_organization`]; they never re-derive access
//! logic.
//!
//! ## Concurrency model
//!
//! One `TenantSession` per principal-device. Session state lives behind a
//! single async mutex and every command holds it end to end, so command
//! application is logically atomic. Directory refreshes triggered by change
//! notifications run without the lock and carry a generation token; a
//! result whose token is older than the session's current generation is
//! discarded, never applied.

pub mod error;
pub mod events;
pub mod resolver;
pub mod session;
pub mod store;

// Re-export main types for convenience
pub use error::{SessionError, SessionResult};
pub use events::{SessionEvent, SessionSnapshot};
pub use resolver::{MembershipResolver, ResolvedDirectory};
pub use session::TenantSession;
pub use store::{MemorySessionStore, SessionStore, SessionStoreError};
