//! # Atrium Capability Authorization
//!
//! This crate derives the capability set consumed by every Atrium feature:
//! which dashboard surfaces are visible and which actions are allowed for
//! the current actor in the currently *effective* organization.
//!
//! ## Overview
//!
//! The atrium-authz crate handles:
//! - **Features**: The gated dashboard surfaces
//! - **Permissions**: The derived, read-only capability set
//! - **Derivation**: The pure function from (role, context, config) to
//!   capabilities
//!
//! ## Architecture
//!
//! ```text
//! (role, is_master_context, is_impersonating, effective config)
//!        │
//!        ▼  Permissions::derive (pure, no I/O)
//! Permissions { visibility flags, action flags, pii_masking }
//! ```
//!
//! Downstream features read only this output. They never re-derive access
//! logic from roles or configs themselves, so the asymmetric visibility
//! rule lives in exactly one place:
//!
//! - A **platform admin** (admin of the master organization) sees each
//!   gated feature according to the effective organization's own config:
//!   the tenant's privacy configuration governs the operator's view.
//! - An **ordinary tenant member** sees every gated feature of their own
//!   organization unconditionally, except the platform-admin-only
//!   business-app catalog.
//! - `pii_masking` always follows the effective config, for every actor.
//!
//! ## Usage
//!
//! ```rust
//! use atrium_authz::{Feature, Permissions};
//! use atrium_org::{OrganizationConfig, OrganizationRole};
//!
//! let config = OrganizationConfig::default();
//!
//! // A tenant admin in their own organization
//! let perms = Permissions::derive(OrganizationRole::Admin, false, false, &config);
//! assert!(perms.can_manage_organization);
//! assert!(perms.can_view(Feature::Crm));
//! assert!(!perms.can_view(Feature::BusinessApps));
//!
//! // Nobody resolved yet: default deny
//! assert!(!Permissions::denied().can_manage_organization);
//! ```

pub mod capabilities;
pub mod features;

// Re-export main types for convenience
pub use capabilities::Permissions;
pub use features::Feature;
