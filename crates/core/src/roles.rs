//! Well-known role names carried in access-token claims.
//!
//! Tokens are issued by the external identity provider; only `staff` and
//! `admin` may upload, edit or delete wallpapers.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

/// Whether a role grants staff privileges.
pub fn is_staff(role: &str) -> bool {
    role == ROLE_STAFF || role == ROLE_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_and_admin_are_staff() {
        assert!(is_staff(ROLE_STAFF));
        assert!(is_staff(ROLE_ADMIN));
    }

    #[test]
    fn other_roles_are_not_staff() {
        assert!(!is_staff("viewer"));
        assert!(!is_staff("Staff"));
        assert!(!is_staff(""));
    }
}
