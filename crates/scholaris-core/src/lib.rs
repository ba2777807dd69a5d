//! Shared kernel for the scholaris scheduling platform.
//!
//! Holds the vocabulary the other crates agree on: the typed
//! [`OrganizationId`] and the [`OrgScoped`] trait that marks records owned
//! by a single organization. Nothing here touches the database or the
//! network.

pub mod ids;
pub mod traits;

pub use ids::{OrganizationId, ParseIdError};
pub use traits::OrgScoped;
