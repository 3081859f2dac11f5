//! Authentication claims and the tenant scope derived from them.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{TenantId, UserId, WorkspaceId};

/// JWT claims for access tokens.
///
/// Tokens are issued by the identity provider; this service only verifies
/// them and reads the tenant/workspace/subject triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Tenant ID.
    pub tenant: Uuid,
    /// Workspace ID (current context).
    pub workspace: Uuid,
    /// User's role in the workspace.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        tenant_id: Uuid,
        workspace_id: Uuid,
        role: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            tenant: tenant_id,
            workspace: workspace_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the parsed workspace role, if recognised.
    #[must_use]
    pub fn workspace_role(&self) -> Option<WorkspaceRole> {
        self.role.parse().ok()
    }

    /// Returns the scope every repository query is restricted to.
    #[must_use]
    pub const fn scope(&self) -> TenantScope {
        TenantScope {
            tenant_id: TenantId::from_uuid(self.tenant),
            workspace_id: WorkspaceId::from_uuid(self.workspace),
            user_id: UserId::from_uuid(self.sub),
        }
    }
}

/// Role of a user inside a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    /// Workspace owner.
    Owner,
    /// Administrator.
    Admin,
    /// May create and edit records.
    Editor,
    /// Read-only access.
    Viewer,
}

impl WorkspaceRole {
    /// Whether the role may create, update or delete records.
    #[must_use]
    pub const fn can_write(self) -> bool {
        !matches!(self, Self::Viewer)
    }
}

impl FromStr for WorkspaceRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            other => Err(format!("unknown workspace role '{other}'")),
        }
    }
}

/// Tenant/workspace/subject triple threaded into every repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Workspace inside the tenant.
    pub workspace_id: WorkspaceId,
    /// Acting user, recorded in audit columns.
    pub user_id: UserId,
}

impl TenantScope {
    /// Creates a scope from raw UUIDs.
    #[must_use]
    pub const fn new(tenant_id: Uuid, workspace_id: Uuid, user_id: Uuid) -> Self {
        Self {
            tenant_id: TenantId::from_uuid(tenant_id),
            workspace_id: WorkspaceId::from_uuid(workspace_id),
            user_id: UserId::from_uuid(user_id),
        }
    }

    /// Tenant UUID for query filters.
    #[must_use]
    pub const fn tenant(&self) -> Uuid {
        self.tenant_id.into_inner()
    }

    /// Workspace UUID for query filters.
    #[must_use]
    pub const fn workspace(&self) -> Uuid {
        self.workspace_id.into_inner()
    }

    /// Acting user UUID for audit columns.
    #[must_use]
    pub const fn user(&self) -> Uuid {
        self.user_id.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    #[test]
    fn test_scope_from_claims() {
        let user = Uuid::new_v4();
        let tenant = Uuid::new_v4();
        let workspace = Uuid::new_v4();
        let claims = Claims::new(user, tenant, workspace, "editor", Utc::now() + Duration::hours(1));

        let scope = claims.scope();
        assert_eq!(scope.user(), user);
        assert_eq!(scope.tenant(), tenant);
        assert_eq!(scope.workspace(), workspace);
    }

    #[rstest]
    #[case("owner", Some(WorkspaceRole::Owner), true)]
    #[case("admin", Some(WorkspaceRole::Admin), true)]
    #[case("editor", Some(WorkspaceRole::Editor), true)]
    #[case("viewer", Some(WorkspaceRole::Viewer), false)]
    fn test_workspace_roles(
        #[case] raw: &str,
        #[case] expected: Option<WorkspaceRole>,
        #[case] writable: bool,
    ) {
        let role = raw.parse::<WorkspaceRole>().ok();
        assert_eq!(role, expected);
        assert_eq!(role.is_some_and(WorkspaceRole::can_write), writable);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let claims = Claims::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "superuser",
            Utc::now() + Duration::hours(1),
        );
        assert!(claims.workspace_role().is_none());
    }
}
