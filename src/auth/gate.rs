use super::{AuthError, Claims, PermissionLevel};

/// Pure permission check over a verified claim. Admin satisfies any
/// requirement; regular users only regular-level requirements.
pub fn require_permission(claims: &Claims, required: PermissionLevel) -> Result<(), AuthError> {
    if claims.permissions.satisfies(required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Restrict an operation to the token's own subject, e.g. a user editing
/// their own record.
pub fn require_self(claims: &Claims, target_subject_id: i64) -> Result<(), AuthError> {
    if claims.sub == target_subject_id {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: i64, permissions: PermissionLevel) -> Claims {
        Claims { sub, permissions, iat: 0, exp: 0 }
    }

    #[test]
    fn admin_satisfies_any_requirement() {
        let c = claims(1, PermissionLevel::Admin);
        assert!(require_permission(&c, PermissionLevel::RegularUser).is_ok());
        assert!(require_permission(&c, PermissionLevel::Admin).is_ok());
    }

    #[test]
    fn regular_user_is_denied_admin_requirement() {
        let c = claims(1, PermissionLevel::RegularUser);
        assert!(require_permission(&c, PermissionLevel::RegularUser).is_ok());
        assert!(matches!(
            require_permission(&c, PermissionLevel::Admin),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn require_self_matches_subject_only() {
        let c = claims(9, PermissionLevel::RegularUser);
        assert!(require_self(&c, 9).is_ok());
        assert!(matches!(require_self(&c, 10), Err(AuthError::Forbidden)));
    }
}
