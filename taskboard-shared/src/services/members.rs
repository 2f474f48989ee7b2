/// Project roster

use uuid::Uuid;

use super::ServiceResult;
use crate::auth::authorization::{authorize, Access};
use crate::auth::session::AuthContext;
use crate::models::membership::ProjectMember;
use crate::store::Store;

/// Members of a project ordered by display name, for any member
///
/// Used to populate assignee pickers, so viewers may read it too.
pub async fn list(
    store: &dyn Store,
    ctx: &AuthContext,
    project_id: Uuid,
) -> ServiceResult<Vec<ProjectMember>> {
    authorize(store, ctx, project_id, Access::Read).await?;

    Ok(store.list_members(project_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::membership::ProjectRole;
    use crate::services::test_support::{project_with_viewer, user};
    use crate::services::ServiceError;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_viewer_reads_roster_in_name_order() {
        let store = MemoryStore::new();
        let owner = user(&store, "zoe@example.com", Some("Zoe")).await;
        let viewer = user(&store, "adam@example.com", Some("Adam")).await;
        let project_id = project_with_viewer(&store, &owner, &viewer).await;

        let members = list(&store, &viewer, project_id).await.unwrap();

        let roster: Vec<(&str, ProjectRole)> = members
            .iter()
            .map(|m| (m.email.as_str(), m.role))
            .collect();
        assert_eq!(
            roster,
            vec![
                ("adam@example.com", ProjectRole::Viewer),
                ("zoe@example.com", ProjectRole::Editor),
            ]
        );
    }

    #[tokio::test]
    async fn test_non_member_cannot_read_roster() {
        let store = MemoryStore::new();
        let owner = user(&store, "a@example.com", None).await;
        let viewer = user(&store, "c@example.com", None).await;
        let outsider = user(&store, "b@example.com", None).await;
        let project_id = project_with_viewer(&store, &owner, &viewer).await;

        let err = list(&store, &outsider, project_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFoundOrForbidden));
    }
}
