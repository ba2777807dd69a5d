//! Ownership marker for organization-scoped records.

use crate::ids::OrganizationId;

/// Implemented by every record that belongs to one organization.
///
/// Gives generic code a uniform way to ask which organization owns a row
/// without knowing the concrete record type, for example when checking
/// that two records fetched independently came from the same school.
///
/// The method returns the id by value; `OrganizationId` is `Copy`.
///
/// # Example
///
/// ```
/// use scholaris_core::{OrgScoped, OrganizationId};
///
/// struct Subject {
///     organization_id: OrganizationId,
/// }
///
/// impl OrgScoped for Subject {
///     fn organization_id(&self) -> OrganizationId {
///         self.organization_id
///     }
/// }
///
/// fn owned_by(record: &dyn OrgScoped, organization: OrganizationId) -> bool {
///     record.organization_id() == organization
/// }
///
/// let organization = OrganizationId::new();
/// let subject = Subject { organization_id: organization };
/// assert!(owned_by(&subject, organization));
/// ```
pub trait OrgScoped {
    /// The organization that owns this record.
    fn organization_id(&self) -> OrganizationId;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RoomRow {
        organization_id: OrganizationId,
    }

    impl OrgScoped for RoomRow {
        fn organization_id(&self) -> OrganizationId {
            self.organization_id
        }
    }

    struct SubjectRow {
        owner: OrganizationId,
    }

    impl OrgScoped for SubjectRow {
        fn organization_id(&self) -> OrganizationId {
            self.owner
        }
    }

    fn same_organization(a: &dyn OrgScoped, b: &dyn OrgScoped) -> bool {
        a.organization_id() == b.organization_id()
    }

    #[test]
    fn reports_the_owning_organization() {
        let organization = OrganizationId::new();
        let room = RoomRow {
            organization_id: organization,
        };
        assert_eq!(room.organization_id(), organization);
    }

    #[test]
    fn comparable_across_record_types() {
        let organization = OrganizationId::new();
        let room = RoomRow {
            organization_id: organization,
        };
        let subject = SubjectRow {
            owner: organization,
        };
        assert!(same_organization(&room, &subject));

        let other = SubjectRow {
            owner: OrganizationId::new(),
        };
        assert!(!same_organization(&room, &other));
    }

    #[test]
    fn usable_as_trait_object() {
        let organization = OrganizationId::new();
        let room = RoomRow {
            organization_id: organization,
        };
        let dyn_ref: &dyn OrgScoped = &room;
        assert_eq!(dyn_ref.organization_id(), organization);
    }
}
