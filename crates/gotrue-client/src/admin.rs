//! Admin user management against admin-scoped endpoints
//!
//! Structurally the same validate → build → send → decode pipeline as
//! the sign-in flows, but authorized with the service API key instead
//! of a user access token. Obtain via [`AuthClient::admin`]; the
//! client's API key must be a service-role key for these calls to be
//! accepted.

use gotrue_proto::credentials::{AdminUserAttributes, GenerateLinkParams, PageParams};
use gotrue_proto::{
    GeneratedLink, Pagination, Result, SignOutScope, User, pagination, request, response,
};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::client::{AuthClient, Authorization};

/// One page of users plus its pagination positions.
#[derive(Debug, Clone)]
pub struct UserList {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

/// Admin operations handle, borrowed from an [`AuthClient`].
pub struct AdminApi<'a> {
    client: &'a AuthClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a AuthClient) -> Self {
        Self { client }
    }

    pub async fn create_user(&self, attributes: AdminUserAttributes) -> Result<User> {
        attributes.validate_for_create()?;
        let wire = request::admin_create_user_request(&attributes);
        let raw = self.client.execute(wire, Authorization::ApiKey).await?;
        response::decode_user(raw.status, &raw.body)
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<User> {
        let wire = request::admin_get_user_request(user_id);
        let raw = self.client.execute(wire, Authorization::ApiKey).await?;
        response::decode_user(raw.status, &raw.body)
    }

    pub async fn update_user_by_id(
        &self,
        user_id: Uuid,
        attributes: AdminUserAttributes,
    ) -> Result<User> {
        let wire = request::admin_update_user_request(user_id, &attributes);
        let raw = self.client.execute(wire, Authorization::ApiKey).await?;
        response::decode_user(raw.status, &raw.body)
    }

    /// Delete a user. With `soft_delete` the provider keeps the record
    /// and only revokes access.
    pub async fn delete_user(&self, user_id: Uuid, soft_delete: bool) -> Result<()> {
        let wire = request::admin_delete_user_request(user_id, soft_delete);
        let raw = self.client.execute(wire, Authorization::ApiKey).await?;
        response::decode_no_content(raw.status, &raw.body)
    }

    /// List users one page at a time. Page positions come from the
    /// response's link header, the total from its count header.
    pub async fn list_users(&self, params: PageParams) -> Result<UserList> {
        let wire = request::admin_list_users_request(params);
        let raw = self.client.execute(wire, Authorization::ApiKey).await?;
        let page = pagination::decode_pagination(
            raw.header(pagination::LINK_HEADER),
            raw.header(pagination::TOTAL_COUNT_HEADER),
        );
        let users = response::decode_user_list(raw.status, &raw.body)?;
        debug!(
            count = users.len(),
            next_page = page.next_page,
            total = page.total,
            "listed users"
        );
        Ok(UserList {
            users,
            pagination: page,
        })
    }

    pub async fn invite_user_by_email(
        &self,
        email: &str,
        data: Option<&Map<String, Value>>,
        redirect_to: Option<&str>,
    ) -> Result<User> {
        if email.is_empty() {
            return Err(gotrue_proto::Error::validation("email", "must not be empty"));
        }
        let wire = request::admin_invite_user_request(email, data, redirect_to);
        let raw = self.client.execute(wire, Authorization::ApiKey).await?;
        response::decode_user(raw.status, &raw.body)
    }

    /// Generate a one-time action link (signup, invite, magiclink,
    /// recovery, email change) for out-of-band delivery.
    pub async fn generate_link(&self, params: GenerateLinkParams) -> Result<GeneratedLink> {
        params.validate()?;
        let wire = request::admin_generate_link_request(&params);
        let raw = self.client.execute(wire, Authorization::ApiKey).await?;
        response::decode_generated_link(raw.status, &raw.body)
    }

    /// Revoke the sessions behind a user's access token. Follows the
    /// same idempotent-success rule as the user-facing sign-out.
    pub async fn sign_out(&self, access_token: &str, scope: SignOutScope) -> Result<()> {
        let wire = request::sign_out_request(scope);
        let raw = self
            .client
            .execute(wire, Authorization::Bearer(access_token))
            .await?;
        response::decode_sign_out(raw.status, &raw.body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gotrue_proto::Error;
    use gotrue_proto::credentials::LinkType;

    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::testing::FakeTransport;

    const USER_BODY: &str = r#"{"id":"7c4b3a6e-9c1a-4f3d-8e6b-2f1a0d9c8b7a","email":"a@b.com"}"#;

    fn client(transport: Arc<FakeTransport>) -> AuthClient {
        let config = ClientConfig::new("https://x.co/auth/v1", "service-key").unwrap();
        AuthClient::with_transport(config, transport)
    }

    #[tokio::test]
    async fn create_user_posts_to_admin_users() {
        let transport = Arc::new(FakeTransport::respond_with(200, USER_BODY));
        let auth = client(transport.clone());

        let user = auth
            .admin()
            .create_user(AdminUserAttributes {
                email: Some("a@b.com".into()),
                password: Some("secret".into()),
                email_confirm: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(user.email.as_deref(), Some("a@b.com"));
        let sent = transport.requests();
        assert_eq!(sent[0].url.as_str(), "https://x.co/auth/v1/admin/users");
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body["email_confirm"], true);
    }

    #[tokio::test]
    async fn create_user_without_contact_is_rejected_locally() {
        let transport = Arc::new(FakeTransport::respond_with(200, USER_BODY));
        let auth = client(transport.clone());

        let err = auth
            .admin()
            .create_user(AdminUserAttributes::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn list_users_decodes_pagination_headers() {
        let body = r#"{"users":[{"id":"7c4b3a6e-9c1a-4f3d-8e6b-2f1a0d9c8b7a"}]}"#;
        let link = r#"<https://x.co/admin/users?page=2>; rel="next", <https://x.co/admin/users?page=5>; rel="last""#;
        let transport = Arc::new(FakeTransport::respond_with_headers(
            200,
            body,
            &[("link", link), ("x-total-count", "42")],
        ));
        let auth = client(transport.clone());

        let list = auth
            .admin()
            .list_users(PageParams {
                page: Some(1),
                per_page: Some(10),
            })
            .await
            .unwrap();

        assert_eq!(list.users.len(), 1);
        assert_eq!(list.pagination.next_page, Some(2));
        assert_eq!(list.pagination.last_page, Some(5));
        assert_eq!(list.pagination.total, 42);
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "https://x.co/auth/v1/admin/users?page=1&per_page=10"
        );
    }

    #[tokio::test]
    async fn delete_user_passes_soft_flag() {
        let transport = Arc::new(FakeTransport::respond_with(200, "{}"));
        let auth = client(transport.clone());
        let id = Uuid::new_v4();

        auth.admin().delete_user(id, true).await.unwrap();

        let sent = transport.requests();
        assert_eq!(
            sent[0].url.as_str(),
            format!("https://x.co/auth/v1/admin/users/{id}")
        );
        assert_eq!(sent[0].body.as_ref().unwrap()["should_soft_delete"], true);
    }

    #[tokio::test]
    async fn missing_user_maps_to_not_found() {
        let transport = Arc::new(FakeTransport::respond_with(
            404,
            r#"{"msg":"user not found"}"#,
        ));
        let auth = client(transport);

        let err = auth
            .admin()
            .get_user_by_id(Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err, Error::NotFound);
    }

    #[tokio::test]
    async fn generate_link_decodes_action_link() {
        let body = r#"{"action_link":"https://x.co/auth/v1/verify?token=abc","verification_type":"magiclink"}"#;
        let transport = Arc::new(FakeTransport::respond_with(200, body));
        let auth = client(transport.clone());

        let link = auth
            .admin()
            .generate_link(GenerateLinkParams {
                link_type: LinkType::Magiclink,
                email: "a@b.com".into(),
                password: None,
                data: None,
                redirect_to: None,
            })
            .await
            .unwrap();

        assert_eq!(link.action_link, "https://x.co/auth/v1/verify?token=abc");
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "https://x.co/auth/v1/admin/generate_link"
        );
    }

    #[tokio::test]
    async fn admin_sign_out_is_idempotent() {
        let transport = Arc::new(FakeTransport::respond_with(
            401,
            r#"{"msg":"invalid token"}"#,
        ));
        let auth = client(transport);
        assert!(
            auth.admin()
                .sign_out("stale-jwt", SignOutScope::Others)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn invite_sends_redirect_as_query() {
        let transport = Arc::new(FakeTransport::respond_with(200, USER_BODY));
        let auth = client(transport.clone());

        auth.admin()
            .invite_user_by_email("a@b.com", None, Some("https://app.example/in"))
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(
            sent[0].url.as_str(),
            "https://x.co/auth/v1/invite?redirect_to=https%3A%2F%2Fapp.example%2Fin"
        );
        assert!(sent[0].body.as_ref().unwrap().get("redirect_to").is_none());
    }
}
