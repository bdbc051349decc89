//! Authorization checks shared by the domain services.

use super::error::Error;
use super::ids::UserId;
use super::user::User;

/// Allow only administrators.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{User, UserId, Username, require_admin};
///
/// let user = User { id: UserId::new(2), username: Username::new("bob").unwrap(), is_admin: false };
/// assert!(require_admin(&user).is_err());
/// ```
pub fn require_admin(user: &User) -> Result<(), Error> {
    if user.is_admin {
        Ok(())
    } else {
        Err(Error::forbidden("Admin access required"))
    }
}

/// Allow administrators and the recorded owner of a resource.
///
/// A resource with no recorded owner is only open to administrators.
pub fn require_admin_or_owner(user: &User, owner: Option<UserId>) -> Result<(), Error> {
    if user.is_admin || owner == Some(user.id) {
        Ok(())
    } else {
        Err(Error::forbidden("Not allowed to modify this resource"))
    }
}
