//! Role-based access control over `/v1/authz`
//!
//! Requires server 1.28 or newer; every operation checks the connected
//! server's version first and fails with `VexdbError::Unsupported` on older
//! servers without sending anything.

use http::Method;
use serde_json::json;

use crate::error::VexdbResult;
use crate::executor::{Executor, expect_rest};
use crate::models::{Role, ServerVersion, User};
use crate::transport::{WireRequest, WireResponse};
use crate::validate;

const RBAC_MIN_VERSION: ServerVersion = ServerVersion {
    major: 1,
    minor: 28,
    patch: 0,
};

#[derive(Clone)]
pub struct Rbac {
    executor: Executor,
}

impl Rbac {
    pub(crate) fn new(executor: Executor) -> Self {
        Self { executor }
    }

    fn check_supported(&self) -> VexdbResult<()> {
        self.executor
            .connection()
            .require_version("rbac", RBAC_MIN_VERSION)
    }

    pub async fn create_role(&self, role: &Role) -> VexdbResult<()> {
        self.check_supported()?;
        validate::non_empty(&role.name, "role name")?;
        let body = serde_json::to_value(role)?;
        let request = WireRequest::rest(Method::POST, "/v1/authz/roles", Some(body));
        expect_rest(self.executor.send(request).await?, &[200, 201])?;
        Ok(())
    }

    pub async fn get_role(&self, name: &str) -> VexdbResult<Role> {
        self.check_supported()?;
        validate::non_empty(name, "role name")?;
        let request = WireRequest::rest(Method::GET, format!("/v1/authz/roles/{}", name), None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn list_roles(&self) -> VexdbResult<Vec<Role>> {
        self.check_supported()?;
        let request = WireRequest::rest(Method::GET, "/v1/authz/roles", None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn role_exists(&self, name: &str) -> VexdbResult<bool> {
        self.check_supported()?;
        validate::non_empty(name, "role name")?;
        let request = WireRequest::rest(Method::GET, format!("/v1/authz/roles/{}", name), None);
        match self.executor.send(request).await? {
            WireResponse::Rest { status: 200, .. } => Ok(true),
            WireResponse::Rest { status: 404, .. } => Ok(false),
            other => {
                expect_rest(other, &[200, 404])?;
                Ok(false)
            }
        }
    }

    /// Replace the role's permissions with the given set
    pub async fn add_permissions(
        &self,
        name: &str,
        permissions: &[crate::models::Permission],
    ) -> VexdbResult<()> {
        self.check_supported()?;
        validate::non_empty(name, "role name")?;
        let body = json!({"permissions": permissions});
        let request = WireRequest::rest(
            Method::POST,
            format!("/v1/authz/roles/{}/add-permissions", name),
            Some(body),
        );
        expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(())
    }

    pub async fn delete_role(&self, name: &str) -> VexdbResult<()> {
        self.check_supported()?;
        validate::non_empty(name, "role name")?;
        let request = WireRequest::rest(Method::DELETE, format!("/v1/authz/roles/{}", name), None);
        expect_rest(self.executor.send(request).await?, &[204, 404])?;
        Ok(())
    }

    pub async fn assign_role(&self, user_id: &str, role: &str) -> VexdbResult<()> {
        self.check_supported()?;
        validate::non_empty(user_id, "user id")?;
        validate::non_empty(role, "role name")?;
        let body = json!({"roles": [role]});
        let request = WireRequest::rest(
            Method::POST,
            format!("/v1/authz/users/{}/assign", user_id),
            Some(body),
        );
        expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(())
    }

    pub async fn revoke_role(&self, user_id: &str, role: &str) -> VexdbResult<()> {
        self.check_supported()?;
        validate::non_empty(user_id, "user id")?;
        validate::non_empty(role, "role name")?;
        let body = json!({"roles": [role]});
        let request = WireRequest::rest(
            Method::POST,
            format!("/v1/authz/users/{}/revoke", user_id),
            Some(body),
        );
        expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(())
    }

    /// User ids currently holding the role
    pub async fn assigned_users(&self, role: &str) -> VexdbResult<Vec<String>> {
        self.check_supported()?;
        validate::non_empty(role, "role name")?;
        let request = WireRequest::rest(
            Method::GET,
            format!("/v1/authz/roles/{}/users", role),
            None,
        );
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn list_users(&self) -> VexdbResult<Vec<User>> {
        self.check_supported()?;
        let request = WireRequest::rest(Method::GET, "/v1/authz/users", None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    /// The user the configured credential authenticates as
    pub async fn get_my_user(&self) -> VexdbResult<User> {
        self.check_supported()?;
        let request = WireRequest::rest(Method::GET, "/v1/authz/users/own", None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn get_user(&self, user_id: &str) -> VexdbResult<User> {
        self.check_supported()?;
        validate::non_empty(user_id, "user id")?;
        let request = WireRequest::rest(Method::GET, format!("/v1/authz/users/{}", user_id), None);
        let body = expect_rest(self.executor.send(request).await?, &[200])?;
        Ok(serde_json::from_value(body)?)
    }
}
