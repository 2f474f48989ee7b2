/// Project authorization
///
/// Every read or write on a project (or on one of its tasks) goes through
/// [`authorize`]. The rules are flat:
///
/// 1. **Membership**: the caller must hold a role on the project. A missing
///    membership and a missing project are reported identically, so callers
///    can't discover projects they don't belong to.
/// 2. **Role**: writes need `editor`; any member may read.
///
/// There is no superuser and no caching: the role is looked up on every call.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::authorization::{authorize, Access};
/// use taskboard_shared::auth::session::AuthContext;
/// use taskboard_shared::store::Store;
/// use uuid::Uuid;
///
/// # async fn example(store: &dyn Store, ctx: &AuthContext, project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let role = authorize(store, ctx, project_id, Access::Write).await?;
/// assert!(role.can_edit());
/// # Ok(())
/// # }
/// ```

use tracing::debug;
use uuid::Uuid;

use super::session::AuthContext;
use crate::models::membership::ProjectRole;
use crate::store::{Store, StoreError};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Project doesn't exist or the caller isn't a member
    #[error("Project not found")]
    NotFoundOrForbidden,

    /// Caller is a member but the role doesn't allow the operation
    #[error("Insufficient permissions: editor role required")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Kind of access requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any member
    Read,

    /// Editors only
    Write,
}

impl Access {
    /// Whether `role` grants this access
    pub fn allowed_for(&self, role: ProjectRole) -> bool {
        match self {
            Access::Read => true,
            Access::Write => role.can_edit(),
        }
    }
}

/// Resolves the caller's role on a project, if any
pub async fn resolve_role(
    store: &dyn Store,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<Option<ProjectRole>, StoreError> {
    store.find_role(user_id, project_id).await
}

/// Checks that the caller may access the project
///
/// Returns the caller's role on success.
///
/// # Errors
///
/// - `NotFoundOrForbidden` if the caller has no membership (including when the
///   project doesn't exist)
/// - `Forbidden` if `access` is `Write` and the caller is a viewer
pub async fn authorize(
    store: &dyn Store,
    ctx: &AuthContext,
    project_id: Uuid,
    access: Access,
) -> Result<ProjectRole, AuthzError> {
    let role = resolve_role(store, ctx.user_id(), project_id)
        .await?
        .ok_or_else(|| {
            debug!(user_id = %ctx.user_id(), %project_id, "Denied: not a member");
            AuthzError::NotFoundOrForbidden
        })?;

    if !access.allowed_for(role) {
        debug!(
            user_id = %ctx.user_id(),
            %project_id,
            role = role.as_str(),
            "Denied: write access requires editor"
        );
        return Err(AuthzError::Forbidden);
    }

    Ok(role)
}
