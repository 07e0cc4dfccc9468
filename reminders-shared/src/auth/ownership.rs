//! Ownership checks for user-owned resources
//!
//! Reading is open to any authenticated caller. Changing or deleting a
//! resource requires the caller to be its owner. The check runs after the
//! resource is fetched and before anything is written.

use uuid::Uuid;

use super::middleware::Caller;

/// A resource that belongs to exactly one user
pub trait Owned {
    /// ID of the owning user
    fn owner_id(&self) -> Uuid;
}

/// The caller tried to modify a resource owned by someone else
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("User {caller} does not own this resource")]
pub struct OwnershipError {
    /// Authenticated user making the request
    pub caller: Uuid,

    /// Actual owner of the resource
    pub owner: Uuid,
}

/// Succeeds only if `caller` owns `resource`
pub fn require_ownership<T: Owned + ?Sized>(caller: &Caller, resource: &T) -> Result<(), OwnershipError> {
    let owner = resource.owner_id();

    if caller.user_id != owner {
        return Err(OwnershipError {
            caller: caller.user_id,
            owner,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        owner: Uuid,
    }

    impl Owned for Note {
        fn owner_id(&self) -> Uuid {
            self.owner
        }
    }

    #[test]
    fn test_owner_passes() {
        let user_id = Uuid::new_v4();
        let note = Note { owner: user_id };

        assert!(require_ownership(&Caller::new(user_id), &note).is_ok());
    }

    #[test]
    fn test_non_owner_fails() {
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let note = Note { owner };

        let err = require_ownership(&Caller::new(intruder), &note).unwrap_err();
        assert_eq!(err.caller, intruder);
        assert_eq!(err.owner, owner);
    }
}
