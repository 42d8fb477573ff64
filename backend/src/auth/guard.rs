//! Ownership guard for user-owned resources
//!
//! Handlers that mutate a resource fetch it first, call
//! [`ensure_owner`], and only then write.

use content_hub_shared::AuthError;
use tracing::warn;
use uuid::Uuid;

use super::AuthUser;

/// A persisted entity with a single owning user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Fail with [`AuthError::NotOwner`] unless `user` owns `resource`
pub fn ensure_owner<R>(resource: &R, user: &AuthUser) -> Result<(), AuthError>
where
    R: Owned + ?Sized,
{
    let owner_id = resource.owner_id();
    if owner_id != user.user_id {
        warn!(
            owner_id = %owner_id,
            user_id = %user.user_id,
            "Rejected access to a resource owned by another user"
        );
        return Err(AuthError::NotOwner);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc {
        owner: Uuid,
    }

    impl Owned for Doc {
        fn owner_id(&self) -> Uuid {
            self.owner
        }
    }

    #[test]
    fn test_owner_passes() {
        let owner = Uuid::new_v4();
        let doc = Doc { owner };

        assert!(ensure_owner(&doc, &AuthUser { user_id: owner }).is_ok());
    }

    #[test]
    fn test_other_user_rejected() {
        let doc = Doc {
            owner: Uuid::new_v4(),
        };
        let intruder = AuthUser {
            user_id: Uuid::new_v4(),
        };

        assert_eq!(ensure_owner(&doc, &intruder).unwrap_err(), AuthError::NotOwner);
    }
}
