//! # Atrium Organization Model
//!
//! This crate provides the multi-tenant organization model for the Atrium
//! dashboard, shared by the directory, session, and authorization crates.
//!
//! ## Overview
//!
//! The atrium-org crate handles:
//! - **Principals**: Authenticated actors supplied by the identity provider
//! - **Organizations**: Isolated customer workspaces (tenants)
//! - **Configs**: Per-organization feature toggle bundles
//! - **Memberships**: Principal-organization role grants
//! - **Roles**: Hierarchical organization roles
//!
//! ## Architecture
//!
//! ```text
//! Principal
//!   └─ Membership ─→ Organization
//!                       ├─ OrganizationConfig (feature toggles)
//!                       ├─ domain auto-join allowlist
//!                       └─ optional domain restriction
//! ```
//!
//! Exactly one organization in a deployment may be the *master*
//! organization: the platform operator's own workspace, whose admins can
//! view other tenants without holding memberships in them.
//!
//! ## Usage
//!
//! ```rust
//! use atrium_org::{Membership, MembershipSource, Organization, OrganizationRole, Principal};
//! use uuid::Uuid;
//!
//! let principal = Principal::new(Uuid::now_v7(), "ada@acme.com");
//!
//! // Create a tenant organization
//! let org = Organization::new("Acme Corp", "acme-corp");
//!
//! // Grant the principal a membership
//! let membership = Membership::new(
//!     org.id,
//!     principal.id,
//!     OrganizationRole::Member,
//!     MembershipSource::Invitation,
//! );
//! assert_eq!(membership.role, OrganizationRole::Member);
//! ```
//!
//! ## Crate Integration
//!
//! This crate is designed to work with:
//! - `atrium-authz`: Capability derivation from role and config
//! - `atrium-directory`: Persistent storage and change notifications
//! - `atrium-session`: Tenant resolution and the active-context state machine

pub mod config;
pub mod membership;
pub mod organization;
pub mod principal;
pub mod roles;

// Re-export main types for convenience
pub use config::OrganizationConfig;
pub use membership::{Membership, MembershipSource};
pub use organization::Organization;
pub use principal::Principal;
pub use roles::OrganizationRole;
