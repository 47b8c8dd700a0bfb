use async_trait::async_trait;
use provsign_core::time::{now, Duration};
use provsign_core::{Context, Error, ProvideCredential, Result};

use crate::constants::*;
use crate::credential::Credential;

/// Load credential from an Azure client secret.
///
/// This provider implements the OAuth2 client credentials grant, which allows
/// applications to authenticate to the management plane using a tenant id,
/// client id, and client secret.
///
/// Reference: <https://learn.microsoft.com/en-us/azure/active-directory/develop/v2-oauth2-client-creds-grant-flow>
#[derive(Debug, Default, Clone)]
pub struct ClientSecretCredentialProvider {
    tenant_id: Option<String>,
    client_id: Option<String>,
}

impl ClientSecretCredentialProvider {
    /// Create a new client secret provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tenant ID.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the client ID.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

#[async_trait]
impl ProvideCredential for ClientSecretCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        // Check if all required parameters are available from environment or config
        let tenant_id = match self.tenant_id.as_ref().or_else(|| envs.get(AZURE_TENANT_ID)) {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let client_id = match self.client_id.as_ref().or_else(|| envs.get(AZURE_CLIENT_ID)) {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let client_secret = match envs.get(AZURE_CLIENT_SECRET) {
            Some(secret) if !secret.is_empty() => secret,
            _ => return Ok(None),
        };

        let authority_host = envs
            .get(AZURE_AUTHORITY_HOST)
            .filter(|h| !h.is_empty())
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_AUTHORITY_HOST);

        let token =
            get_client_secret_token(tenant_id, client_id, client_secret, authority_host, ctx)
                .await?;

        let expires_at = now()
            + Duration::try_seconds(token.expires_in as i64)
                .unwrap_or_else(|| Duration::try_minutes(10).expect("in bounds"));

        Ok(Some(Credential::with_bearer_token(
            &token.access_token,
            Some(expires_at),
        )))
    }
}

#[derive(serde::Deserialize)]
struct ClientSecretTokenResponse {
    access_token: String,
    expires_in: u64,
}

async fn get_client_secret_token(
    tenant_id: &str,
    client_id: &str,
    client_secret: &str,
    authority_host: &str,
    ctx: &Context,
) -> Result<ClientSecretTokenResponse> {
    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        authority_host.trim_end_matches('/'),
        tenant_id
    );

    let body = form_urlencoded::Serializer::new(String::new())
        .append_pair("scope", MANAGEMENT_SCOPE)
        .append_pair("client_id", client_id)
        .append_pair("client_secret", client_secret)
        .append_pair("grant_type", "client_credentials")
        .finish();

    let req = http::Request::builder()
        .method(http::Method::POST)
        .uri(&url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(bytes::Bytes::from(body))
        .map_err(|e| Error::unexpected("failed to build client secret request").with_source(e))?;

    let resp = ctx.http_send(req).await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = String::from_utf8_lossy(resp.body());
        return Err(Error::unexpected(format!(
            "client secret request failed with status {status}: {body}"
        )));
    }

    serde_json::from_slice(resp.body())
        .map_err(|e| Error::unexpected("failed to parse client secret response").with_source(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use provsign_core::{HttpSend, StaticEnv};
    use std::collections::HashMap;

    #[derive(Debug)]
    struct TokenEndpoint;

    #[async_trait]
    impl HttpSend for TokenEndpoint {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            assert_eq!(req.method(), http::Method::POST);
            assert!(req
                .uri()
                .to_string()
                .ends_with("/my-tenant/oauth2/v2.0/token"));

            let body = String::from_utf8_lossy(req.body());
            assert!(body.contains("grant_type=client_credentials"));

            Ok(http::Response::new(Bytes::from_static(
                br#"{"token_type":"Bearer","expires_in":3599,"access_token":"aad-token"}"#,
            )))
        }
    }

    fn client_secret_env() -> HashMap<String, String> {
        HashMap::from([
            (AZURE_TENANT_ID.to_string(), "my-tenant".to_string()),
            (AZURE_CLIENT_ID.to_string(), "my-client".to_string()),
            (AZURE_CLIENT_SECRET.to_string(), "my-secret".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_client_secret_exchanges_token() {
        let ctx = Context::new()
            .with_env(StaticEnv {
                envs: client_secret_env(),
            })
            .with_http_send(TokenEndpoint);

        let provider = ClientSecretCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await.unwrap().unwrap();

        match cred {
            Credential::BearerToken { token, expires_at } => {
                assert_eq!(token, "aad-token");
                assert!(expires_at.unwrap() > now());
            }
            _ => panic!("Expected BearerToken credential"),
        }
    }

    #[tokio::test]
    async fn test_client_secret_skips_without_config() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::new(),
        });

        let provider = ClientSecretCredentialProvider::new();
        assert!(provider.provide_credential(&ctx).await.unwrap().is_none());
    }
}
