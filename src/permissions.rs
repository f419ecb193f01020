//! Role → permission mapping.
//!
//! Every role lists its permissions explicitly. Roles happen to nest, but
//! nothing here relies on that.

use serde::{Deserialize, Serialize};

use crate::domain::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewOwnDonations,
    CreateDonation,
    ViewEvents,
    RegisterForEvents,
    ViewAllDonations,
    UpdateDonationStatus,
    ApproveDonations,
    ManageDonations,
    ViewStatistics,
    ManageVolunteers,
    ManageCategories,
    ViewReports,
    ManageEvents,
    ManageUsers,
}

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::ViewOwnDonations,
        Permission::CreateDonation,
        Permission::ViewEvents,
        Permission::RegisterForEvents,
        Permission::ViewAllDonations,
        Permission::UpdateDonationStatus,
        Permission::ApproveDonations,
        Permission::ManageDonations,
        Permission::ViewStatistics,
        Permission::ManageVolunteers,
        Permission::ManageCategories,
        Permission::ViewReports,
        Permission::ManageEvents,
        Permission::ManageUsers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewOwnDonations => "view_own_donations",
            Permission::CreateDonation => "create_donation",
            Permission::ViewEvents => "view_events",
            Permission::RegisterForEvents => "register_for_events",
            Permission::ViewAllDonations => "view_all_donations",
            Permission::UpdateDonationStatus => "update_donation_status",
            Permission::ApproveDonations => "approve_donations",
            Permission::ManageDonations => "manage_donations",
            Permission::ViewStatistics => "view_statistics",
            Permission::ManageVolunteers => "manage_volunteers",
            Permission::ManageCategories => "manage_categories",
            Permission::ViewReports => "view_reports",
            Permission::ManageEvents => "manage_events",
            Permission::ManageUsers => "manage_users",
        }
    }

    pub fn parse(name: &str) -> Option<Permission> {
        Permission::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const DONOR: &[Permission] = &[
    Permission::ViewOwnDonations,
    Permission::CreateDonation,
    Permission::ViewEvents,
];

const VOLUNTEER: &[Permission] = &[
    Permission::ViewOwnDonations,
    Permission::CreateDonation,
    Permission::ViewEvents,
    Permission::RegisterForEvents,
    Permission::ViewAllDonations,
    Permission::UpdateDonationStatus,
];

const INTERNAL: &[Permission] = &[
    Permission::ViewOwnDonations,
    Permission::CreateDonation,
    Permission::ViewEvents,
    Permission::RegisterForEvents,
    Permission::ViewAllDonations,
    Permission::UpdateDonationStatus,
    Permission::ApproveDonations,
    Permission::ManageDonations,
    Permission::ViewStatistics,
    Permission::ManageVolunteers,
    Permission::ManageCategories,
    Permission::ViewReports,
];

const ADMIN: &[Permission] = &[
    Permission::ViewOwnDonations,
    Permission::CreateDonation,
    Permission::ViewEvents,
    Permission::RegisterForEvents,
    Permission::ViewAllDonations,
    Permission::UpdateDonationStatus,
    Permission::ApproveDonations,
    Permission::ManageDonations,
    Permission::ViewStatistics,
    Permission::ManageVolunteers,
    Permission::ManageCategories,
    Permission::ViewReports,
    Permission::ManageEvents,
    Permission::ManageUsers,
];

pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Donor => DONOR,
        Role::Volunteer => VOLUNTEER,
        Role::Internal => INTERNAL,
        Role::Admin => ADMIN,
    }
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// String-keyed lookup for stored role names. Unknown roles or permissions
/// are simply not granted.
pub fn has_permission_named(role: &str, permission: &str) -> bool {
    match (Role::parse(role), Permission::parse(permission)) {
        (Some(role), Some(permission)) => has_permission(role, permission),
        _ => false,
    }
}

pub fn can_access_admin_panel(role: Role) -> bool {
    has_permission(role, Permission::ManageUsers)
        || has_permission(role, Permission::ManageEvents)
        || has_permission(role, Permission::ViewReports)
}

pub fn can_manage_donations(role: Role) -> bool {
    has_permission(role, Permission::UpdateDonationStatus)
        || has_permission(role, Permission::ManageDonations)
}

pub fn can_manage_volunteers(role: Role) -> bool {
    has_permission(role, Permission::ManageVolunteers)
        || has_permission(role, Permission::ManageUsers)
}
